pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
pub const PCAP_READER_BUFFER_SIZE: usize = 64 * 1024;

pub const UDP_HEADER_LEN: usize = 8;

//! Capture fixtures for integration tests.
//!
//! Writes big-endian PCAPNG files (section header, one Ethernet interface,
//! enhanced packet blocks) around hand-built IPv4/UDP frames.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const TZSP_PORT: u16 = 37008;

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_ARP: u16 = 0x0806;
const ICMP_PROTO: u8 = 1;
const UDP_PROTO: u8 = 17;

/// Version 1 `ReceivedTagList` header with an Ethernet payload.
pub const TZSP_HEADER: [u8; 4] = [0x01, 0x00, 0x00, 0x01];

/// RSSI -60, channel 6, end, then a 4-byte opaque frame.
pub fn sample_tzsp_datagram() -> Vec<u8> {
    let mut datagram = TZSP_HEADER.to_vec();
    datagram.extend_from_slice(&[0x0a, 0x01, 0xc4]);
    datagram.extend_from_slice(&[0x12, 0x01, 0x06]);
    datagram.push(0x01);
    datagram.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    datagram
}

pub enum Frame<'a> {
    Udp {
        src_port: u16,
        dst_port: u16,
        payload: &'a [u8],
    },
    /// IPv4 echo request: network layer present, no UDP.
    Icmp,
    Arp,
}

pub fn temp_capture_path(name: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("tzsp_{name}_{unique}_{}.pcapng", std::process::id()))
}

/// Write `frames` as a PCAPNG capture, one second apart starting at `t=1s`.
pub fn write_capture(path: &Path, frames: &[Frame<'_>]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(0x0A0D0D0A, &section_header_body()));
    output.extend_from_slice(&pcapng_block(1, &interface_desc_body()));

    for (idx, frame) in frames.iter().enumerate() {
        let data = match frame {
            Frame::Udp {
                src_port,
                dst_port,
                payload,
            } => build_ipv4_udp_frame([10, 0, 0, 1], [10, 0, 0, 2], *src_port, *dst_port, payload),
            Frame::Icmp => build_ipv4_frame(
                [10, 0, 0, 1],
                [10, 0, 0, 2],
                ICMP_PROTO,
                &[0x08, 0x00, 0xf7, 0xff, 0x00, 0x00, 0x00, 0x00],
            ),
            Frame::Arp => build_arp_frame(),
        };
        let ts_us = (idx as u64 + 1) * 1_000_000;
        output.extend_from_slice(&pcapng_block(6, &enhanced_packet_body(ts_us, &data)));
    }

    fs::write(path, output).expect("write capture");
}

fn build_ipv4_udp_frame(
    src_ip: [u8; 4],
    dst_ip: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let udp_len = 8u16 + (payload.len() as u16);
    let mut udp = Vec::with_capacity(udp_len as usize);
    udp.extend_from_slice(&src_port.to_be_bytes());
    udp.extend_from_slice(&dst_port.to_be_bytes());
    udp.extend_from_slice(&udp_len.to_be_bytes());
    udp.extend_from_slice(&0u16.to_be_bytes());
    udp.extend_from_slice(payload);
    build_ipv4_frame(src_ip, dst_ip, UDP_PROTO, &udp)
}

fn build_ipv4_frame(src_ip: [u8; 4], dst_ip: [u8; 4], protocol: u8, body: &[u8]) -> Vec<u8> {
    let mut frame = ethernet_header(ETHERTYPE_IPV4);

    let total_len = 20u16 + (body.len() as u16);
    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&total_len.to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = protocol;
    ip_header[12..16].copy_from_slice(&src_ip);
    ip_header[16..20].copy_from_slice(&dst_ip);
    let checksum = ipv4_checksum(&ip_header);
    ip_header[10..12].copy_from_slice(&checksum.to_be_bytes());
    frame.extend_from_slice(&ip_header);
    frame.extend_from_slice(body);
    frame
}

fn build_arp_frame() -> Vec<u8> {
    let mut frame = ethernet_header(ETHERTYPE_ARP);
    frame.extend_from_slice(&[0u8; 28]);
    frame
}

fn ethernet_header(ethertype: u16) -> Vec<u8> {
    let mut header = Vec::with_capacity(14);
    header.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    header.extend_from_slice(&[0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f]);
    header.extend_from_slice(&ethertype.to_be_bytes());
    header
}

fn ipv4_checksum(header: &[u8; 20]) -> u16 {
    let mut sum = 0u32;
    for chunk in header.chunks(2) {
        sum = sum.wrapping_add(u16::from_be_bytes([chunk[0], chunk[1]]) as u32);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    body
}

fn enhanced_packet_body(ts_us: u64, data: &[u8]) -> Vec<u8> {
    let ts_high = ((ts_us >> 32) & 0xFFFF_FFFF) as u32;
    let ts_low = (ts_us & 0xFFFF_FFFF) as u32;
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}

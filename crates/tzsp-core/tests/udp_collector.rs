use std::net::UdpSocket;
use std::time::Duration;

use tzsp_core::{
    CollectOptions, EncapsulatedProtocol, ErrorPolicy, UdpDatagramSource, collect,
};

#[test]
fn collector_decodes_live_datagrams_until_idle() {
    let source = UdpDatagramSource::bind("127.0.0.1:0")
        .unwrap()
        .with_idle_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    let target = source.local_addr().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    sender
        .send_to(&[0x01, 0x00, 0x00, 0x12, 0x01, 0xaa, 0xbb], target)
        .unwrap();
    sender.send_to(&[0x01, 0x00], target).unwrap();
    sender
        .send_to(&[0x01, 0x00, 0x00, 0x7f, 0x00, 0x01], target)
        .unwrap();

    let mut decoded = Vec::new();
    let summary = collect(source, CollectOptions::default(), |datagram| {
        decoded.push(datagram);
        Ok(())
    })
    .unwrap();

    assert_eq!(summary.datagrams_total, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].packet.header.protocol, EncapsulatedProtocol::IEEE80211);
    assert_eq!(decoded[0].packet.trailing_data, vec![0xaa, 0xbb]);
    assert_eq!(decoded[0].peer, Some(sender.local_addr().unwrap()));
    assert_eq!(decoded[1].packet.header.protocol, EncapsulatedProtocol::WLANAVS);
    assert!(summary.time_start.is_some());
}

#[test]
fn collector_honours_datagram_limit() {
    let source = UdpDatagramSource::bind("127.0.0.1:0")
        .unwrap()
        .with_idle_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let target = source.local_addr().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    for _ in 0..2 {
        sender.send_to(&[0x01, 0x00, 0x00, 0x01, 0x01], target).unwrap();
    }

    let options = CollectOptions {
        policy: ErrorPolicy::Abort,
        limit: Some(1),
    };
    let summary = collect(source, options, |_| Ok(())).unwrap();
    assert_eq!(summary.datagrams_total, 1);
    assert_eq!(summary.decoded, 1);
}

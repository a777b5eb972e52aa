// ABOUTME: sends the net action payload over tcp or udp to a resolved destination.
// ABOUTME: captures the os-assigned local endpoint once the socket is connected.

use std::io;
use std::net::SocketAddr;

use little_canary_common::{Activity, NetAction, Protocol};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};

use crate::error::{CanaryError, Result};

pub async fn run(net: &NetAction) -> Result<Activity> {
    let destination = net.destination();
    let addrs = resolve(net, &destination).await?;

    let source = match net.protocol {
        Protocol::Tcp => send_tcp(&addrs, &destination, net.data.as_bytes()).await?,
        Protocol::Udp => send_udp(&addrs, &destination, net.data.as_bytes()).await?,
    };

    log::debug!("{:?} {} -> {}", net.protocol, source, destination);
    Ok(Activity::Net {
        protocol: net.protocol,
        destination,
        source: source.to_string(),
        data_size: net.data.len() as u64,
    })
}

async fn resolve(net: &NetAction, destination: &str) -> Result<Vec<SocketAddr>> {
    let resolve_err = |source| CanaryError::Resolve {
        destination: destination.to_string(),
        source,
    };

    let port: u16 = net
        .port
        .parse()
        .map_err(|_| resolve_err(io::Error::new(io::ErrorKind::InvalidInput, "invalid port")))?;

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((net.host.as_str(), port))
        .await
        .map_err(resolve_err)?
        .collect();

    if addrs.is_empty() {
        return Err(resolve_err(io::Error::new(
            io::ErrorKind::NotFound,
            "no addresses found",
        )));
    }
    Ok(addrs)
}

/// Connects to each address in turn; the local endpoint exists only after connect.
async fn send_tcp(addrs: &[SocketAddr], destination: &str, data: &[u8]) -> Result<SocketAddr> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect(*addr).await {
            Ok(mut stream) => {
                let source = stream.local_addr()?;
                if !data.is_empty() {
                    stream.write_all(data).await?;
                }
                stream.shutdown().await?;
                return Ok(source);
            }
            Err(err) => last_err = Some(err),
        }
    }

    Err(CanaryError::Connect {
        destination: destination.to_string(),
        source: last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no addresses found")),
    })
}

/// Connecting a datagram socket only fixes the peer; unreachable hosts rarely
/// surface here, unlike tcp.
async fn send_udp(addrs: &[SocketAddr], destination: &str, data: &[u8]) -> Result<SocketAddr> {
    let addr = addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| CanaryError::Connect {
            destination: destination.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
        })?;

    let bind_addr: SocketAddr = if addr.is_ipv4() {
        (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(addr).await.map_err(|source| CanaryError::Connect {
        destination: destination.to_string(),
        source,
    })?;

    let source = socket.local_addr()?;
    if !data.is_empty() {
        socket.send(data).await?;
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn net(protocol: Protocol, host: &str, port: &str, data: &str) -> NetAction {
        NetAction {
            protocol,
            host: host.to_string(),
            port: port.to_string(),
            data: data.to_string(),
        }
    }

    #[tokio::test]
    async fn tcp_delivers_payload_and_reports_connected_source() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut conn, peer) = listener.accept().await.unwrap();
            let mut msg = Vec::new();
            conn.read_to_end(&mut msg).await.unwrap();
            (msg, peer)
        });

        let activity = run(&net(Protocol::Tcp, "127.0.0.1", &port.to_string(), "hello there"))
            .await
            .unwrap();

        let (msg, peer) = server.await.unwrap();
        assert_eq!(msg, b"hello there");

        match activity {
            Activity::Net {
                protocol,
                destination,
                source,
                data_size,
            } => {
                assert_eq!(protocol, Protocol::Tcp);
                assert_eq!(destination, format!("127.0.0.1:{port}"));
                assert_eq!(source, peer.to_string());
                assert_eq!(data_size, 11);
            }
            other => panic!("unexpected activity: {other:?}"),
        }
    }

    #[tokio::test]
    async fn tcp_with_empty_payload_sends_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut conn, _) = listener.accept().await.unwrap();
            let mut msg = Vec::new();
            conn.read_to_end(&mut msg).await.unwrap();
            msg
        });

        let activity = run(&net(Protocol::Tcp, "127.0.0.1", &port.to_string(), ""))
            .await
            .unwrap();

        assert!(server.await.unwrap().is_empty());
        assert!(matches!(activity, Activity::Net { data_size: 0, .. }));
    }

    #[tokio::test]
    async fn tcp_refused_port_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = run(&net(Protocol::Tcp, "127.0.0.1", &port.to_string(), "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, CanaryError::Connect { .. }));
    }

    #[tokio::test]
    async fn out_of_range_port_is_resolution_error() {
        let err = run(&net(Protocol::Tcp, "localhost", "89893", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, CanaryError::Resolve { .. }));
    }

    #[tokio::test]
    async fn unknown_host_is_resolution_error() {
        let err = run(&net(Protocol::Tcp, "aklsjasdkljd.invalid", "1", "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, CanaryError::Resolve { .. }));
    }

    #[tokio::test]
    async fn udp_delivers_one_datagram_and_reports_source() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();

        let activity = run(&net(Protocol::Udp, "127.0.0.1", &port.to_string(), "ab cd"))
            .await
            .unwrap();

        let mut buf = [0u8; 64];
        let (n, from) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ab cd");

        match activity {
            Activity::Net {
                protocol,
                source,
                data_size,
                ..
            } => {
                assert_eq!(protocol, Protocol::Udp);
                assert_eq!(source, from.to_string());
                assert_eq!(data_size, 5);
            }
            other => panic!("unexpected activity: {other:?}"),
        }
    }

    #[tokio::test]
    async fn udp_to_closed_port_does_not_fail_at_send() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = receiver.local_addr().unwrap().port();
        drop(receiver);

        let activity = run(&net(Protocol::Udp, "127.0.0.1", &port.to_string(), "x"))
            .await
            .unwrap();
        assert!(matches!(activity, Activity::Net { data_size: 1, .. }));
    }
}

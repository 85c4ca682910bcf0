//! OSC listener — UDP socket listener on a dedicated thread.

use std::io;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rosc::{decoder, OscPacket};
use tracing::{debug, info, warn};

use super::config::OscConfig;
use super::mapping::{apply_osc_message, OscMapping};
use crate::control::ControlSender;

/// Active OSC listener running on a background thread.
pub struct OscListener {
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    port: u16,
}

/// Map every message in a packet, recursing into bundles.
fn dispatch(packet: &OscPacket, mappings: &[OscMapping], sender: &ControlSender) -> bool {
    match packet {
        OscPacket::Message(msg) => {
            match apply_osc_message(msg, mappings) {
                Some(event) => {
                    debug!(addr = %msg.addr, ?event, "osc event");
                    if sender.send(event).is_err() {
                        return false;
                    }
                }
                None => debug!(addr = %msg.addr, "unmapped osc message"),
            }
            true
        }
        OscPacket::Bundle(bundle) => bundle
            .content
            .iter()
            .all(|inner| dispatch(inner, mappings, sender)),
    }
}

impl OscListener {
    /// Start listening for OSC messages on a UDP port.
    pub fn start(config: &OscConfig, sender: ControlSender) -> io::Result<Self> {
        let addr = format!("127.0.0.1:{}", config.listen_port);
        let socket = UdpSocket::bind(&addr)?;
        // Short timeout so the stop flag is checked periodically.
        socket.set_read_timeout(Some(Duration::from_millis(100)))?;
        let port = socket.local_addr()?.port();

        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();
        let mappings = config.mappings.clone();

        let thread = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            while !stop_clone.load(Ordering::Relaxed) {
                match socket.recv_from(&mut buf) {
                    Ok((size, _addr)) => match decoder::decode_udp(&buf[..size]) {
                        Ok((_, packet)) => {
                            if !dispatch(&packet, &mappings, &sender) {
                                debug!("control receiver dropped, osc listener exiting");
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "malformed osc packet"),
                    },
                    Err(ref e)
                        if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
                    {
                        continue;
                    }
                    Err(e) => {
                        warn!(error = %e, "osc socket error, listener exiting");
                        break;
                    }
                }
            }
        });

        info!(port, "osc listener started");
        Ok(Self {
            stop_flag,
            thread: Some(thread),
            port,
        })
    }

    /// Get the listening port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Signal the listener to stop and wait for its thread.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
            info!(port = self.port, "osc listener stopped");
        }
    }
}

impl Drop for OscListener {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{control_channel, ControlEvent, ControlParam};
    use rosc::{encoder, OscMessage, OscType};

    fn config(port: u16) -> OscConfig {
        OscConfig {
            listen_port: port,
            ..OscConfig::default()
        }
    }

    #[test]
    fn start_and_stop() {
        let (tx, _rx) = control_channel();
        let mut listener = OscListener::start(&config(19100), tx).unwrap();
        assert_eq!(listener.port(), 19100);
        listener.stop();
    }

    #[test]
    fn send_and_receive_osc() {
        let (tx, rx) = control_channel();
        let mut listener = OscListener::start(&config(19101), tx).unwrap();

        let msg = OscPacket::Message(OscMessage {
            addr: "/reverb".to_string(),
            args: vec![OscType::Float(45.0)],
        });
        let encoded = encoder::encode(&msg).unwrap();
        let sender_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender_socket.send_to(&encoded, "127.0.0.1:19101").unwrap();

        std::thread::sleep(Duration::from_millis(200));

        assert_eq!(
            rx.poll(),
            Some(ControlEvent::SetControl(ControlParam::Reverb, 45.0))
        );
        listener.stop();
    }

    #[test]
    fn bundle_messages_are_all_delivered() {
        let (tx, rx) = control_channel();
        let mut listener = OscListener::start(&config(19102), tx).unwrap();

        let bundle = OscPacket::Bundle(rosc::OscBundle {
            timetag: rosc::OscTime { seconds: 0, fractional: 1 },
            content: vec![
                OscPacket::Message(OscMessage {
                    addr: "/stop".to_string(),
                    args: vec![],
                }),
                OscPacket::Message(OscMessage {
                    addr: "/volume".to_string(),
                    args: vec![OscType::Int(50)],
                }),
            ],
        });
        let encoded = encoder::encode(&bundle).unwrap();
        let sender_socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender_socket.send_to(&encoded, "127.0.0.1:19102").unwrap();

        std::thread::sleep(Duration::from_millis(200));

        assert_eq!(
            rx.drain(),
            vec![
                ControlEvent::Stop,
                ControlEvent::SetControl(ControlParam::Volume, 50.0),
            ]
        );
        listener.stop();
    }

    #[test]
    fn bind_failure_on_used_port() {
        let (tx1, _rx1) = control_channel();
        let _listener1 = OscListener::start(&config(19103), tx1).unwrap();
        let (tx2, _rx2) = control_channel();
        assert!(OscListener::start(&config(19103), tx2).is_err());
    }
}

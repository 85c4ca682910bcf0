//! Control surface integration — config file, OSC messages and control events
//! driving a session engine.

use std::net::UdpSocket;
use std::time::Duration;

use rosc::{encoder, OscMessage, OscPacket, OscType};

use vibe_oracle::config::{load_from, save_to, EngineConfig};
use vibe_oracle::control::{control_channel, ControlEvent, ControlParam, Controller};
use vibe_oracle::emotion::Emotion;
use vibe_oracle::osc::{apply_osc_message, OscConfig, OscListener};
use vibe_oracle::session::Engine;
use vibe_oracle::style::{Style, StyleSet};

fn msg(addr: &str, args: Vec<OscType>) -> OscMessage {
    OscMessage {
        addr: addr.to_string(),
        args,
    }
}

#[test]
fn osc_messages_drive_a_session() {
    let mappings = OscConfig::default().mappings;
    let mut engine = Engine::new(8000, &EngineConfig::default());
    let mut controller = Controller::new();

    let script = [
        msg("/play", vec![OscType::String("lofi".into()), OscType::String("acid".into())]),
        msg("/emotion", vec![OscType::String("sad".into())]),
        msg("/filter", vec![OscType::Float(250.0)]),
        msg("/toggle", vec![]),
    ];
    for m in &script {
        let event = apply_osc_message(m, &mappings).expect("mapped");
        controller.dispatch(&mut engine, event).unwrap();
    }
    assert!(!engine.is_playing());
    assert!(!controller.is_playing());
    assert_eq!(engine.current_emotion(), Some(Emotion::Sad));
    assert_eq!(engine.controls().filter, 100.0);

    let resume = apply_osc_message(&msg("/play", vec![]), &mappings).unwrap();
    assert_eq!(resume, ControlEvent::Resume);
    controller.dispatch(&mut engine, resume).unwrap();
    assert!(engine.is_playing());
    assert_eq!(engine.layer_count(), 2);
    // 85 * 0.7 falls below the tempo range.
    assert_eq!(engine.tempo(), 60.0);
}

#[test]
fn queued_batch_resolves_toggles_in_order() {
    // The whole batch is mapped before the engine sees any of it.
    let mappings = OscConfig::default().mappings;
    let (tx, rx) = control_channel();
    for m in [
        msg("/play", vec![OscType::String("lofi".into()), OscType::String("acid".into())]),
        msg("/toggle", vec![]),
        msg("/toggle", vec![]),
        msg("/toggle", vec![]),
    ] {
        tx.send(apply_osc_message(&m, &mappings).expect("mapped")).unwrap();
    }

    let mut engine = Engine::new(8000, &EngineConfig::default());
    let mut notifications = engine.subscribe();
    let mut controller = Controller::new();
    for event in rx.drain() {
        controller.dispatch(&mut engine, event).unwrap();
    }
    assert!(!controller.is_playing());
    assert!(!engine.is_playing());
    assert_eq!(engine.layer_count(), 0);
    // Two stops, each rewinding to the intro.
    assert_eq!(notifications.drain().len(), 2);
}

#[test]
fn unknown_styles_are_ignored() {
    let mappings = OscConfig::default().mappings;
    let event = apply_osc_message(
        &msg("/play", vec![OscType::String("polka".into()), OscType::String("trap".into())]),
        &mappings,
    );
    assert_eq!(event, Some(ControlEvent::Start(StyleSet::single(Style::Trap))));
    assert_eq!(
        apply_osc_message(&msg("/play", vec![OscType::String("polka".into())]), &mappings),
        None
    );
}

#[test]
fn config_file_configures_engine_and_osc() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        r#"
seed: 3
emotion: happy
controls:
  reverb: 70
osc:
  enabled: true
  listen_port: 9100
"#,
    )
    .unwrap();

    let config = load_from(&path).unwrap();
    assert!(config.osc.enabled);
    assert_eq!(config.osc.listen_port, 9100);
    assert_eq!(config.osc.mappings.len(), 8);

    let mut engine = Engine::new(8000, &config);
    assert_eq!(engine.current_emotion(), Some(Emotion::Happy));
    assert_eq!(engine.controls().reverb, 70.0);
    engine.start(&StyleSet::single(Style::Cyberpunk));
    assert!((engine.tempo() - 144.0).abs() < 1e-9);

    let copy = dir.path().join("copy.yaml");
    save_to(&copy, &config).unwrap();
    assert_eq!(load_from(&copy).unwrap(), config);
}

#[test]
fn listener_forwards_to_control_channel() {
    let config = OscConfig {
        enabled: true,
        listen_port: 19110,
        ..OscConfig::default()
    };
    let (tx, rx) = control_channel();
    let mut listener = OscListener::start(&config, tx).unwrap();

    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    for packet in [
        OscPacket::Message(msg("/bpm", vec![OscType::Double(300.0)])),
        OscPacket::Message(msg("/emotion", vec![OscType::String("none".into())])),
        OscPacket::Message(msg("/unmapped", vec![])),
    ] {
        socket
            .send_to(&encoder::encode(&packet).unwrap(), "127.0.0.1:19110")
            .unwrap();
    }
    std::thread::sleep(Duration::from_millis(300));

    assert_eq!(
        rx.drain(),
        vec![
            ControlEvent::SetControl(ControlParam::Bpm, 200.0),
            ControlEvent::SetEmotion(None),
        ]
    );
    listener.stop();
}

use std::sync::Arc;

use placard::{
    Effect, MapPlaceholder, Placeholder, PlaceholderKind, PlaceholderRegistry, RecordingSink,
    Settings, StringPlaceholder, TemplateEngine,
};
use placard_render::{json, mini, RichText};
use placard_wire::{
    bungee, BungeeComponent, BurstConfig, BurstDetector, ChatInterceptor, Field, ManualClock,
    NativeCodec, NativeComponent, Outcome, Packet, PacketKind, WireFormatDecoder, WireShape,
    WrappedChatComponent,
};
use uuid::Uuid;

/// Native components are component JSON in UTF-8.
struct Utf8Codec;

impl NativeCodec for Utf8Codec {
    fn to_json(&self, component: &NativeComponent) -> Result<String, String> {
        String::from_utf8(component.payload.clone()).map_err(|e| e.to_string())
    }

    fn from_json(&self, json: &str) -> Result<NativeComponent, String> {
        Ok(NativeComponent {
            payload: json.as_bytes().to_vec(),
        })
    }
}

fn engine() -> (Arc<TemplateEngine>, Arc<RecordingSink>) {
    let registry = PlaceholderRegistry::with_placeholders([
        Placeholder::new(
            "rank",
            PlaceholderKind::Map(MapPlaceholder::new([("vip", "<gold>VIP")], "Member", true)),
        ),
        Placeholder::new(
            "nothing",
            PlaceholderKind::String(StringPlaceholder::new("")),
        ),
    ]);
    let sink = Arc::new(RecordingSink::new());
    let engine = TemplateEngine::new(Arc::new(registry)).with_effects(sink.clone());
    (Arc::new(engine), sink)
}

fn interceptor() -> (ChatInterceptor<Arc<ManualClock>>, Arc<RecordingSink>, Arc<ManualClock>) {
    let (engine, sink) = engine();
    let clock = Arc::new(ManualClock::new(0));
    let detector = BurstDetector::new(BurstConfig::default(), Arc::clone(&clock));
    let interceptor = ChatInterceptor::with_detector(engine, &Settings::default(), detector)
        .with_native_codec(Arc::new(Utf8Codec));
    (interceptor, sink, clock)
}

fn json_packet(json: &str) -> Packet {
    Packet::new(PacketKind::SystemChat, vec![Field::Text(json.to_string())])
}

fn text_of(packet: &Packet) -> RichText {
    match &packet.fields[0] {
        Field::Text(raw) => json::from_str(raw).unwrap(),
        Field::WrappedChat(wrapped) => json::from_str(&wrapped.json).unwrap(),
        Field::Legacy(components) => bungee::to_rich(components).unwrap(),
        Field::Native(native) => json::from_str(std::str::from_utf8(&native.payload).unwrap()).unwrap(),
        Field::Other(_) => panic!("no text field"),
    }
}

// ==================== Shape Round Trip Tests ====================

#[test]
fn test_each_shape_writes_back_what_it_read() {
    let rich = mini::parse("<red>a <bold>b</bold></red> <click:run_command:'/spawn'>c</click>");
    let json_text = json::to_string(&rich);
    let decoder = WireFormatDecoder::new(false).with_native_codec(Arc::new(Utf8Codec));

    let packets = [
        (
            WireShape::LegacyComponents,
            Field::Legacy(vec![bungee::from_rich(&rich).unwrap()]),
        ),
        (
            WireShape::WrappedComponent,
            Field::WrappedChat(WrappedChatComponent {
                json: json_text.clone(),
            }),
        ),
        (WireShape::JsonString, Field::Text(json_text.clone())),
        (
            WireShape::Native,
            Field::Native(NativeComponent {
                payload: json_text.as_bytes().to_vec(),
            }),
        ),
    ];

    for (shape, field) in packets {
        let mut packet = Packet::new(PacketKind::Chat, vec![field]);
        let message = decoder.decode(&packet).unwrap();
        assert_eq!(message.shape, shape);
        assert_eq!(mini::parse(&message.text).runs(), rich.runs(), "{:?}", shape);

        decoder.encode(&mut packet, &message, &rich).unwrap();
        assert_eq!(text_of(&packet).runs(), rich.runs(), "{:?}", shape);
    }
}

// ==================== Shape Cache Tests ====================

#[test]
fn test_cached_shape_is_not_retried() {
    let decoder = WireFormatDecoder::new(true);
    let first = Packet::new(
        PacketKind::Chat,
        vec![Field::WrappedChat(WrappedChatComponent {
            json: r#""wrapped""#.into(),
        })],
    );
    assert_eq!(decoder.decode(&first).unwrap().text, "wrapped");
    assert_eq!(
        decoder.cached_shape(PacketKind::Chat),
        Some(WireShape::WrappedComponent)
    );

    let second = Packet::new(PacketKind::Chat, vec![Field::Text(r#""raw""#.into())]);
    assert_eq!(decoder.decode(&second), None);

    let other_kind = Packet::new(PacketKind::SystemChat, vec![Field::Text(r#""raw""#.into())]);
    assert_eq!(decoder.decode(&other_kind).unwrap().text, "raw");

    decoder.clear_cache();
    assert_eq!(decoder.decode(&second).unwrap().text, "raw");
}

#[test]
fn test_cache_disabled_tries_every_shape() {
    let decoder = WireFormatDecoder::new(false);
    let first = Packet::new(
        PacketKind::Chat,
        vec![Field::Legacy(vec![BungeeComponent::text("legacy")])],
    );
    decoder.decode(&first).unwrap();
    assert_eq!(decoder.cached_shape(PacketKind::Chat), None);

    let second = Packet::new(PacketKind::Chat, vec![Field::Text(r#""raw""#.into())]);
    assert_eq!(decoder.decode(&second).unwrap().shape, WireShape::JsonString);
}

// ==================== Interceptor Tests ====================

#[test]
fn test_unmarked_message_passes_through() {
    let (i, _, _) = interceptor();
    let mut packet = json_packet(r#"{"text":"hello <gold>there"}"#);
    let before = packet.clone();
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::PassThrough);
    assert_eq!(packet, before);
}

#[test]
fn test_prefixed_message_rewritten() {
    let (i, _, _) = interceptor();
    let mut packet = json_packet(r#"{"text":"$Rank: <p:rank:VIP>"}"#);
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::Rewritten);
    let text = text_of(&packet);
    assert_eq!(text.plain(), "Rank: VIP");
    assert!(text.runs().last().unwrap().style.color.is_some());
}

#[test]
fn test_prefix_after_leading_style() {
    let (i, _, _) = interceptor();
    let mut packet = json_packet(r#"{"text":"$hi","color":"red"}"#);
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::Rewritten);
    let text = text_of(&packet);
    assert_eq!(text.plain(), "hi");
    assert_eq!(text.runs(), mini::parse("<red>hi").runs());
}

#[test]
fn test_inline_placeholder_without_prefix() {
    let (i, _, _) = interceptor();
    let mut packet = json_packet(r#"{"text":"You are <p:rank:guest>"}"#);
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::Rewritten);
    assert_eq!(text_of(&packet).plain(), "You are Member");
}

#[test]
fn test_empty_result_cancels() {
    let (i, _, _) = interceptor();
    let mut packet = json_packet(r#"{"text":"$<p:nothing>"}"#);
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::Cancelled);
}

#[test]
fn test_empty_message_passes_through() {
    let (i, _, _) = interceptor();
    let mut packet = json_packet(r#"{"text":""}"#);
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::PassThrough);
}

#[test]
fn test_effects_fire_for_session() {
    let (i, sink, _) = interceptor();
    let session = Uuid::new_v4();
    let mut packet = json_packet(r#"{"text":"$<sound:ui.click>"}"#);
    assert_eq!(i.on_packet(session, &mut packet), Outcome::Cancelled);
    let recorded = sink.take();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, session);
    assert!(matches!(recorded[0].1, Effect::Sound { .. }));
}

#[test]
fn test_burst_mutes_ambient_effects() {
    let (i, sink, clock) = interceptor();
    let session = Uuid::new_v4();
    let mut packet = json_packet("{\"text\":\"$\u{200B}<sound:ui.click>\"}");
    assert_eq!(i.on_packet(session, &mut packet), Outcome::Rewritten);
    assert!(sink.is_empty());
    assert!(i.detector().is_active(session));

    clock.advance(200);
    let mut packet = json_packet(r#"{"text":"$<sound:ui.click>"}"#);
    i.on_packet(session, &mut packet);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_blank_flood_mutes_effects() {
    let (i, sink, clock) = interceptor();
    let session = Uuid::new_v4();
    for _ in 0..20 {
        clock.advance(20);
        let mut blank = json_packet(r#"{"text":" "}"#);
        assert_eq!(i.on_packet(session, &mut blank), Outcome::PassThrough);
    }
    let mut packet = json_packet(r#"{"text":"$hey<actionbar:hi>"}"#);
    assert_eq!(i.on_packet(session, &mut packet), Outcome::Rewritten);
    assert!(sink.is_empty());

    i.end_session(session);
    assert_eq!(i.detector().tracked(), 0);
}

#[test]
fn test_rewrite_lands_in_the_field_that_was_read() {
    let (i, _, _) = interceptor();
    let mut packet = Packet::new(
        PacketKind::SystemChat,
        vec![
            Field::Text(String::new()),
            Field::Text(r#"{"text":"$<gold>hi"}"#.to_string()),
        ],
    );
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::Rewritten);
    assert_eq!(packet.fields[0], Field::Text(String::new()));
    let Field::Text(raw) = &packet.fields[1] else {
        panic!("text field replaced by another type");
    };
    assert_eq!(json::from_str(raw).unwrap().runs(), mini::parse("<gold>hi").runs());
}

#[test]
fn test_translatable_message_passes_through() {
    let (i, _, _) = interceptor();
    let mut packet = json_packet(r#"{"translate":"chat.type.text","with":["Steve","$<p:rank:vip>"]}"#);
    let before = packet.clone();
    assert_eq!(i.on_packet(Uuid::new_v4(), &mut packet), Outcome::PassThrough);
    assert_eq!(packet, before);
}

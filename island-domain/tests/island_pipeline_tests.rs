// island-domain/tests/island_pipeline_tests.rs

use async_trait::async_trait;
use island_core::config::IslandConfig;
use island_domain::pipeline::{DeliveryError, IslandDelivery, IslandPayload};
use island_domain::theming::{AppThemeOverride, Rule, RuleConditions, MANIFEST_FILE};
use island_domain::{
    initialize, ActiveTheme, FileThemeStore, IslandPipeline, ManualClock, NotificationEvent, OutputId, Outcome, RenderMode,
    RenderedSurface, Theme, ThemeStore, ThemeStoreError, WidgetUpdateEvent,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

#[derive(Default)]
struct RecordingDelivery {
    emitted: Mutex<Vec<(String, OutputId, IslandPayload)>>,
    cancelled: Mutex<Vec<(String, OutputId)>>,
}

#[async_trait]
impl IslandDelivery for RecordingDelivery {
    async fn emit(&self, key: &str, output_id: OutputId, payload: IslandPayload) -> Result<(), DeliveryError> {
        self.emitted.lock().push((key.to_string(), output_id, payload));
        Ok(())
    }

    async fn cancel(&self, key: &str, output_id: OutputId) -> Result<(), DeliveryError> {
        self.cancelled.lock().push((key.to_string(), output_id));
        Ok(())
    }
}

impl RecordingDelivery {
    fn last_params(&self) -> Value {
        let emitted = self.emitted.lock();
        let (_, _, payload) = emitted.last().expect("something was emitted");
        serde_json::from_str(&payload.params).expect("params are JSON")
    }
}

struct Harness {
    _dir: TempDir,
    clock: Arc<ManualClock>,
    store: FileThemeStore,
    pipeline: IslandPipeline,
    delivery: Arc<RecordingDelivery>,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = IslandConfig { themes_dir: Some(dir.path().join("themes")), ..IslandConfig::default() };
    let active = Arc::new(ActiveTheme::new());
    let clock = Arc::new(ManualClock::new());
    let delivery = Arc::new(RecordingDelivery::default());
    let store = FileThemeStore::from_config(&config, active.clone()).unwrap();
    let pipeline = IslandPipeline::with_clock(&config, active, delivery.clone(), clock.clone());
    Harness { _dir: dir, clock, store, pipeline, delivery }
}

fn package(theme: &Theme) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(MANIFEST_FILE, FileOptions::default()).unwrap();
    writer.write_all(&serde_json::to_vec(theme).unwrap()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn music_theme() -> Theme {
    let mut theme = Theme::new("Music First");
    theme.global.highlight_color = Some("#112233".to_string());
    theme.apps.insert(
        "com.app.music".to_string(),
        AppThemeOverride { highlight_color: None, shape_id: Some("squircle".to_string()), ..Default::default() },
    );
    let mut media = Rule::new("media", 50);
    media.conditions = RuleConditions { package: Some("com.app.music".to_string()), ..Default::default() };
    media.target_layout = Some("MEDIA".to_string());
    theme.rules.push(media);
    theme
}

fn emitted_layout(outcome: &Outcome) -> &str {
    match outcome {
        Outcome::Emitted { layout, .. } => layout,
        other => panic!("expected an emitted island, got {:?}", other),
    }
}

#[tokio::test]
async fn installed_theme_styles_and_retargets_notifications() {
    let h = harness();
    let id = h.store.install(package(&music_theme())).await.unwrap();
    assert!(h.store.activate(&id).await);

    let music = NotificationEvent::new("m1", "com.app.music").with_content("Song", "Artist");
    let outcome = h.pipeline.on_notification_posted(&music).await;
    assert_eq!(emitted_layout(&outcome), "MEDIA");
    let params = h.delivery.last_params();
    assert_eq!(params["style"]["highlightColor"], "#112233");
    assert_eq!(params["style"]["shapeId"], "squircle");

    let other = NotificationEvent::new("o1", "com.app.other").with_content("Hi", "there");
    let outcome = h.pipeline.on_notification_posted(&other).await;
    assert_eq!(emitted_layout(&outcome), "STANDARD");
    let params = h.delivery.last_params();
    assert_eq!(params["style"]["highlightColor"], "#112233");
    assert_eq!(params["style"]["shapeId"], "circle");
}

#[tokio::test]
async fn timer_takes_precedence_over_progress() {
    let h = harness();
    let event = NotificationEvent::new("t1", "com.clock").with_chronometer(1_700_000_000_000).with_progress(0, 10);
    assert_eq!(emitted_layout(&h.pipeline.on_notification_posted(&event).await), "TIMER");
}

#[tokio::test]
async fn progress_updates_are_throttled_and_reuse_one_output() {
    let h = harness();
    let first = NotificationEvent::new("dl", "com.dl").with_content("Downloading", "a.zip").with_progress(10, 50);
    let second = NotificationEvent::new("dl", "com.dl").with_content("Downloading", "a.zip").with_progress(20, 50);

    let Outcome::Emitted { output_id, .. } = h.pipeline.on_notification_posted(&first).await else {
        panic!("first update should be emitted");
    };
    assert_eq!(h.pipeline.on_notification_posted(&second).await, Outcome::Throttled);

    h.clock.advance_ms(301);
    let Outcome::Emitted { output_id: again, .. } = h.pipeline.on_notification_posted(&second).await else {
        panic!("update after the window should be emitted");
    };
    assert_eq!(again, output_id);
    assert_eq!(h.pipeline.sessions().len(), 1);

    assert_eq!(h.pipeline.on_notification_removed("dl").await, Outcome::Cancelled { output_id });
    assert!(h.pipeline.sessions().is_empty());
    assert_eq!(h.delivery.emitted.lock().len(), 2);
    assert_eq!(h.delivery.cancelled.lock().as_slice(), &[("dl".to_string(), output_id)]);
}

#[tokio::test]
async fn deleting_active_theme_falls_back_to_baseline() {
    let h = harness();
    let id = h.store.install(package(&music_theme())).await.unwrap();
    h.store.activate(&id).await;
    assert!(h.store.delete(&id).await.unwrap());

    let music = NotificationEvent::new("m1", "com.app.music");
    assert_eq!(emitted_layout(&h.pipeline.on_notification_posted(&music).await), "STANDARD");
    let params = h.delivery.last_params();
    assert_eq!(params["style"]["highlightColor"], "#FFFFFF");
    assert_eq!(params["style"]["iconPaddingPercent"], 15);
}

#[tokio::test]
async fn rejected_package_leaves_store_and_pipeline_untouched() {
    let h = harness();
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(MANIFEST_FILE, FileOptions::default()).unwrap();
    writer.write_all(&serde_json::to_vec(&music_theme()).unwrap()).unwrap();
    writer.start_file("../../escape.txt", FileOptions::default()).unwrap();
    writer.write_all(b"pwned").unwrap();
    let archive = writer.finish().unwrap().into_inner();

    let err = h.store.install(archive).await.unwrap_err();
    assert!(matches!(err, ThemeStoreError::PathTraversal { .. }));
    assert!(h.store.list().await.unwrap().is_empty());
    assert!(!h.store.themes_dir().join("escape.txt").exists());
    assert!(!h.store.themes_dir().join("../escape.txt").exists());

    let event = NotificationEvent::new("k", "com.app.music");
    assert_eq!(emitted_layout(&h.pipeline.on_notification_posted(&event).await), "STANDARD");
}

#[tokio::test]
async fn widget_updates_follow_their_own_windows() {
    let h = harness();
    let snapshot = WidgetUpdateEvent::new(5, RenderMode::Snapshot, RenderedSurface::new(vec![0u8; 8]));

    let Outcome::Emitted { output_id, .. } = h.pipeline.on_widget_update(&snapshot).await else {
        panic!("first widget update should be emitted");
    };
    h.clock.advance_ms(1000);
    assert_eq!(h.pipeline.on_widget_update(&snapshot).await, Outcome::Throttled);
    assert!(matches!(
        h.pipeline.on_widget_update(&snapshot.clone().forced()).await,
        Outcome::Emitted { output_id: id, .. } if id == output_id
    ));
    assert_eq!(h.pipeline.on_widget_removed(5).await, Outcome::Cancelled { output_id });
}

#[tokio::test]
async fn initialize_restores_configured_theme() {
    let dir = tempfile::tempdir().unwrap();
    let themes_dir = dir.path().join("themes");
    let seed = FileThemeStore::new(&themes_dir, Arc::new(ActiveTheme::new()));
    let id = seed.install(package(&music_theme())).await.unwrap();

    let config =
        IslandConfig { themes_dir: Some(themes_dir), active_theme: Some(id.to_string()), ..IslandConfig::default() };
    let delivery = Arc::new(RecordingDelivery::default());
    let services = initialize(&config, delivery.clone()).await.unwrap();
    assert!(services.store.active().is_active(&id));

    let music = NotificationEvent::new("m1", "com.app.music").with_content("Song", "Artist");
    assert_eq!(emitted_layout(&services.pipeline.on_notification_posted(&music).await), "MEDIA");
    assert_eq!(delivery.last_params()["style"]["highlightColor"], "#112233");
}

#[tokio::test]
async fn initialize_with_missing_theme_falls_back_to_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let config = IslandConfig {
        themes_dir: Some(dir.path().join("themes")),
        active_theme: Some("gone".to_string()),
        ..IslandConfig::default()
    };
    let delivery = Arc::new(RecordingDelivery::default());
    let services = initialize(&config, delivery.clone()).await.unwrap();
    assert!(services.store.active().snapshot().is_none());

    let event = NotificationEvent::new("k", "com.app.music");
    assert_eq!(emitted_layout(&services.pipeline.on_notification_posted(&event).await), "STANDARD");
    assert_eq!(delivery.last_params()["style"]["highlightColor"], "#FFFFFF");
}

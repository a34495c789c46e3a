use std::fs;

use log::{debug, error, info};

use ov2640_snapshot_cam::core::{AppConfig, CameraApp, LogStatus};
use ov2640_snapshot_cam::hardware::video::{CaptureBuffer, CaptureSignal, ModeController, PollingWait};
use ov2640_snapshot_cam::hardware::{Ov2640, ShutterButton};
use ov2640_snapshot_cam::sim::{
    rgb565_test_pattern, synthetic_capture, synthetic_jpeg, SimClock, SimSensorBus, SimVideoPort,
};
use ov2640_snapshot_cam::storage::{DirStorage, PhotoStore};

/// シミュレーションのループ回数（1 回 = 10ms）
const SIM_ITERATIONS: u32 = 300;
const LOOP_INTERVAL_MS: u32 = 10;
/// ボタンを押し続ける周期内の位置
const PRESS_WINDOW: std::ops::Range<u32> = 40..45;
const PRESS_PERIOD: u32 = 100;

/// ホスト上で撮影パイプライン全体を動かすシミュレーター
///
/// 第 1 引数で保存先ディレクトリを上書きできる。
fn main() -> anyhow::Result<()> {
    let app_config = AppConfig::load().map_err(|e| {
        eprintln!("設定ファイルの読み込みに失敗しました: {}", e);
        anyhow::anyhow!("設定ファイルの読み込みエラー: {}", e)
    })?;

    let default_level = if app_config.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    info!("OV2640 スナップショットカメラ シミュレーター v{}", ov2640_snapshot_cam::VERSION);

    let photo_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| app_config.photo_dir.clone());
    fs::create_dir_all(&photo_dir).map_err(|e| {
        error!("保存先ディレクトリを作成できません: {}", e);
        anyhow::anyhow!("保存先ディレクトリの作成エラー ({}): {}", photo_dir, e)
    })?;
    info!("保存先: {}", photo_dir);

    // 仮想ハードウェア
    let clock = SimClock::new();
    let (isr, driver) = CaptureSignal::channel();
    clock.attach(isr);

    let port = SimVideoPort::new(clock.clone());
    port.set_raw_frame(rgb565_test_pattern(app_config.preview.frame_size));
    let jpeg = synthetic_jpeg(48 * 1024);
    port.set_jpeg_frame(synthetic_capture(128, &jpeg, 512));

    let sensor = Ov2640::new(SimSensorBus::new(), clock.clone());
    let wait = PollingWait::new(clock.clone(), app_config.poll_interval_ms);
    let preview_buffer = CaptureBuffer::new(app_config.preview.frame_size.rgb565_bytes())?;
    let modes = ModeController::new(
        sensor,
        port,
        wait,
        driver,
        preview_buffer,
        app_config.mode_settings(),
    )?;

    let storage = DirStorage::new(&photo_dir).with_short_names_only(app_config.short_names_only);
    let store = PhotoStore::new(storage, app_config.store_settings());
    let snapshot_buffer = CaptureBuffer::new(app_config.snapshot_buffer_bytes)?;

    let mut app = CameraApp::new(
        modes,
        store,
        LogStatus,
        snapshot_buffer,
        app_config.revert_delay_ms,
    );
    app.start()?;

    let mut button = ShutterButton::new(true);
    let mut saved = 0u32;
    for iteration in 0..SIM_ITERATIONS {
        app.modes_mut().settle(LOOP_INTERVAL_MS);

        if let Some(frame) = app.poll_preview() {
            if frame.frame_count % 25 == 0 {
                debug!(
                    "プレビュー {}x{} ({} バイト) {} fps, 累計 {} フレーム",
                    frame.width,
                    frame.height,
                    frame.data.len(),
                    frame.fps,
                    frame.frame_count
                );
            }
        }

        let pressed = PRESS_WINDOW.contains(&(iteration % PRESS_PERIOD));
        if button.update(pressed) {
            info!("シャッターボタンが押されました");
            match app.capture_jpeg() {
                Ok(photo) => {
                    saved += 1;
                    info!(
                        "保存完了: {} ({} バイト, SHA256: {})",
                        photo.name, photo.bytes_written, photo.sha256
                    );
                }
                Err(e) => error!("撮影エラー: {}", e),
            }
        }
    }

    info!("シミュレーション終了: {} 枚保存しました", saved);
    Ok(())
}

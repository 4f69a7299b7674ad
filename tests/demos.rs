use pulse_echo::render::FrameRecorder;
use pulse_echo::scene::{CompressionScene, DopplerScene, Scene};
use pulse_echo::{ClockConfig, CompressionConfig, Config, DopplerConfig, Driver, Storable};

fn scratch_file(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("pulse-echo-{}-{}", std::process::id(), name))
}

#[test]
fn doppler_demo_records_frames() {
    let scene = DopplerScene::new(&DopplerConfig::default()).unwrap();
    let surface = scene.surface();
    let mut driver = Driver::new(
        scene,
        FrameRecorder::new(surface.width, surface.height),
        &ClockConfig::default(),
    );
    assert_eq!(driver.run(|clock| clock.frame >= 5), 5);
    assert!((driver.clock().t - (10.0 + 5.0 * 2.0 / 60.0)).abs() < 1e-9);

    let recorder = driver.into_renderer();
    assert_eq!(recorder.frames.len(), 5);
    // The target line moves left as the target closes in.
    let target_x: Vec<i32> = recorder
        .frames
        .iter()
        .map(|frame| frame.lines[1].points[0].0)
        .collect();
    assert!(target_x.windows(2).all(|w| w[1] <= w[0]));
    assert!(target_x[0] > target_x[4]);
}

#[test]
fn compression_demo_writes_json_and_svg() {
    let scene = CompressionScene::new(&CompressionConfig::default()).unwrap();
    let mut driver = Driver::new(scene, FrameRecorder::new(1000, 400), &ClockConfig::default());
    driver.run(|clock| clock.frame >= 2);
    let recorder = driver.into_renderer();

    let path = scratch_file("frames.json");
    recorder.to_file(&path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(json["width"], 1000);
    assert_eq!(json["frames"].as_array().unwrap().len(), 2);
    assert_eq!(json["frames"][1]["lines"].as_array().unwrap().len(), 4);

    let svg = recorder.last_svg().unwrap();
    assert_eq!(svg.matches("<polyline").count(), 4);
}

#[test]
fn config_file_overrides_demo() {
    let path = scratch_file("config.json");
    std::fs::write(
        &path,
        r#"{ "clock": { "time_step": 0.1 }, "compression": { "pulse_compression": false } }"#,
    )
    .unwrap();
    let config = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.clock.frame_rate, 60);
    assert!(!config.compression.pulse_compression);

    let scene = CompressionScene::new(&config.compression).unwrap();
    let mut driver = Driver::new(scene, FrameRecorder::new(1000, 400), &config.clock);
    driver.run(|clock| clock.frame >= 3);
    assert!((driver.clock().t - 0.3).abs() < 1e-9);
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(Config::from_file(&scratch_file("absent.json")).is_err());
}

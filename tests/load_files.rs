//! Integration tests loading real files from disk in all three formats.

use std::fs;
use std::path::{Path, PathBuf};

use pcload::prelude::*;

/// One sample point: position, rgb in [0, 1], opacity.
struct Sample {
    pos: [f32; 3],
    rgb: [f32; 3],
    opacity: f32,
}

/// 5x5x5 grid of points with colors ramping along each axis, padded with
/// a deterministic shell up to 1000 points.
fn samples() -> Vec<Sample> {
    let mut out = Vec::with_capacity(1000);
    for i in 0..5 {
        for j in 0..5 {
            for k in 0..5 {
                out.push(Sample {
                    pos: [(i as f32 - 2.0) * 0.5, (j as f32 - 2.0) * 0.5, (k as f32 - 2.0) * 0.5],
                    rgb: [i as f32 / 4.0, j as f32 / 4.0, k as f32 / 4.0],
                    opacity: 1.0,
                });
            }
        }
    }
    while out.len() < 1000 {
        let t = out.len() as f32 * 0.1;
        let r = 0.5 + (out.len() % 7) as f32 * 0.25;
        out.push(Sample {
            pos: [r * t.cos(), r * t.sin(), r * (t * 0.5).cos()],
            rgb: [(t.sin() + 1.0) * 0.5, (t.cos() + 1.0) * 0.5, 0.5],
            opacity: 0.75,
        });
    }
    out
}

/// 56-byte records: position, scale, identity quaternion (x, y, z, w), rgb, opacity.
fn write_splat(path: &Path, samples: &[Sample]) {
    let mut bytes = Vec::with_capacity(samples.len() * 56);
    for s in samples {
        let floats = s
            .pos
            .iter()
            .chain(&[0.1f32, 0.1, 0.1])
            .chain(&[0.0f32, 0.0, 0.0, 1.0])
            .chain(&s.rgb)
            .chain(std::iter::once(&s.opacity));
        for v in floats {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
    }
    fs::write(path, bytes).unwrap();
}

/// 32-byte records with 8-bit RGBA.
fn write_standard_splat(path: &Path, samples: &[Sample]) {
    let mut bytes = Vec::with_capacity(samples.len() * 32);
    for s in samples {
        for v in s.pos.iter().chain(&[0.1f32, 0.1, 0.1]) {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let [r, g, b] = s.rgb.map(|c| (c * 255.0) as u8);
        bytes.extend_from_slice(&[r, g, b, (s.opacity * 255.0) as u8]);
        bytes.extend_from_slice(&[128, 128, 128, 255]);
    }
    fs::write(path, bytes).unwrap();
}

fn write_ascii_ply(path: &Path, samples: &[Sample]) {
    let mut text = format!(
        "ply\nformat ascii 1.0\nelement vertex {}\n\
         property float x\nproperty float y\nproperty float z\n\
         property uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n",
        samples.len()
    );
    for s in samples {
        let [r, g, b] = s.rgb.map(|c| (c * 255.0) as u8);
        text.push_str(&format!("{} {} {} {} {} {}\n", s.pos[0], s.pos[1], s.pos[2], r, g, b));
    }
    fs::write(path, text).unwrap();
}

fn write_binary_splat_ply(path: &Path, samples: &[Sample]) {
    let mut bytes = format!(
        "ply\nformat binary_little_endian 1.0\ncomment gaussian splat export\nelement vertex {}\n\
         property float x\nproperty float y\nproperty float z\n\
         property float f_dc_0\nproperty float f_dc_1\nproperty float f_dc_2\n\
         property float opacity\nend_header\n",
        samples.len()
    )
    .into_bytes();
    for s in samples {
        for v in s.pos.iter().chain(&[0.0f32, 0.0, 0.0, 0.0]) {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
    }
    fs::write(path, bytes).unwrap();
}

fn write_xyz(path: &Path, samples: &[Sample]) {
    let mut text = String::new();
    for s in samples {
        text.push_str(&format!(
            "{} {} {} {} {} {}\n",
            s.pos[0], s.pos[1], s.pos[2], s.rgb[0], s.rgb[1], s.rgb[2]
        ));
    }
    fs::write(path, text).unwrap();
}

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn uncentered() -> CloudLoader {
    CloudLoader::new(
        FsSource,
        LoaderSettings {
            center_on_load: false,
            ..Default::default()
        },
    )
}

#[test]
fn test_splat_layout_ambiguity_resolves_extended() {
    let fx = Fixture::new();
    let s = samples();
    let path = fx.path("example.splat");
    write_splat(&path, &s);
    // 56000 bytes is a multiple of 32 and 56; bytes 24..28 hold qx = 0.0
    assert_eq!(fs::metadata(&path).unwrap().len() % 224, 0);

    let cloud = uncentered().load(&path, &mut NoProgress).unwrap();
    assert_eq!(cloud.len(), 1000);
    assert_eq!(cloud.positions().len(), cloud.colors().len());
    for (i, s) in s.iter().enumerate() {
        assert_eq!(cloud.positions()[i], Vec3::new(s.pos[0], -s.pos[1], s.pos[2]));
        assert_eq!(cloud.colors()[i], Vec4::new(s.rgb[0], s.rgb[1], s.rgb[2], s.opacity));
    }
}

#[test]
fn test_standard_splat() {
    let fx = Fixture::new();
    let s = samples();
    let path = fx.path("standard.splat");
    // 999 records: 31968 bytes, not a multiple of 56
    write_standard_splat(&path, &s[..999]);

    let cloud = uncentered().load(&path, &mut NoProgress).unwrap();
    assert_eq!(cloud.len(), 999);
    assert_eq!(cloud.positions()[0], Vec3::new(-1.0, 1.0, -1.0));
    assert_eq!(cloud.colors()[0], Vec4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(cloud.colors()[124], Vec4::new(1.0, 1.0, 1.0, 1.0));
}

#[test]
fn test_ascii_ply() {
    let fx = Fixture::new();
    let s = samples();
    let path = fx.path("example.ply");
    write_ascii_ply(&path, &s);

    let cloud = uncentered().load(&path, &mut NoProgress).unwrap();
    assert_eq!(cloud.len(), 1000);
    // Grid corner (4, 4, 4) has full-intensity color
    assert_eq!(cloud.positions()[124], Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(cloud.colors()[124], Vec4::ONE);
    // (2, 0, 0): 0.5 * 255 = 127
    let c = cloud.colors()[50];
    assert!((c.x - 127.0 / 255.0).abs() < 1e-6);
    assert_eq!(c.y, 0.0);
}

#[test]
fn test_binary_ply_spherical_harmonics() {
    let fx = Fixture::new();
    let s = samples();
    let path = fx.path("splat_export.PLY");
    write_binary_splat_ply(&path, &s);

    let cloud = uncentered().load(&path, &mut NoProgress).unwrap();
    assert_eq!(cloud.len(), 1000);
    let c = cloud.colors()[0];
    assert!((c.x - 0.6225).abs() < 1e-4);
    assert_eq!(c.x, c.y);
    assert_eq!(c.y, c.z);
    assert_eq!(c.w, 0.5);
}

#[test]
fn test_xyz_unit_colors() {
    let fx = Fixture::new();
    let s = samples();
    let path = fx.path("example.xyz");
    write_xyz(&path, &s);

    let cloud = uncentered().load(&path, &mut NoProgress).unwrap();
    assert_eq!(cloud.len(), 1000);
    assert_eq!(cloud.colors()[124], Vec4::ONE);
    assert_eq!(cloud.colors()[31], Vec4::new(0.25, 0.25, 0.25, 1.0));
}

#[test]
fn test_progress_through_loader() {
    let fx = Fixture::new();
    let path = fx.path("example.xyz");
    write_xyz(&path, &samples());

    let mut events = Vec::new();
    uncentered()
        .load(&path, &mut |e: ProgressEvent| events.push(e))
        .unwrap();
    assert_eq!(events, vec![ProgressEvent::new(1000, 0)]);
}

#[test]
fn test_channel_progress_sink() {
    let fx = Fixture::new();
    let path = fx.path("example.ply");
    write_ascii_ply(&path, &samples());

    let (tx, rx) = std::sync::mpsc::channel();
    uncentered().load(&path, &mut ChannelProgress(tx)).unwrap();
    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(events, vec![ProgressEvent::new(1000, 1000)]);
}

#[test]
fn test_missing_and_unsupported_files() {
    let fx = Fixture::new();
    let mut loader = CloudLoader::from_fs();

    let missing = fx.path("nope.ply");
    let err = loader.load(&missing, &mut NoProgress).unwrap_err();
    assert_eq!(err.to_string(), format!("could not open file: {}", missing.display()));

    let obj = fx.path("mesh.obj");
    fs::write(&obj, "v 0 0 0\n").unwrap();
    let err = loader.load(&obj, &mut NoProgress).unwrap_err();
    assert_eq!(err.to_string(), "unsupported format: obj");

    assert!(loader.cache().is_empty());
}

#[test]
fn test_cache_recency_across_files() {
    let fx = Fixture::new();
    let s = samples();
    let paths: Vec<PathBuf> = (0..6).map(|i| fx.path(&format!("cloud{i}.xyz"))).collect();
    for (i, p) in paths.iter().enumerate() {
        write_xyz(p, &s[..i + 1]);
    }

    let mut loader = CloudLoader::from_fs();
    for p in &paths[..5] {
        loader.load(p, &mut NoProgress).unwrap();
    }
    // Refresh the second file, then overflow the cache
    loader.load(&paths[1], &mut NoProgress).unwrap();
    loader.load(&paths[5], &mut NoProgress).unwrap();

    assert_eq!(loader.cache().len(), 5);
    assert!(!loader.cache().contains(&paths[0]));
    assert!(loader.cache().contains(&paths[1]));

    // A cached file keeps serving its decoded cloud after disk changes
    fs::write(&paths[1], "9 9 9\n9 9 9\n9 9 9\n").unwrap();
    assert_eq!(loader.load(&paths[1], &mut NoProgress).unwrap().len(), 2);
}

#[test]
fn test_loaded_clouds_are_centered() {
    let fx = Fixture::new();
    let path = fx.path("offset.xyz");
    fs::write(&path, "10 20 30\n12 22 34\n").unwrap();

    let mut loader = CloudLoader::from_fs();
    let cloud = loader.load(&path, &mut NoProgress).unwrap();
    assert_eq!(cloud.bounds().center(), Vec3::ZERO);
    assert_eq!(cloud.positions()[0], Vec3::new(-1.0, -1.0, -2.0));
}

#[test]
fn test_uncached_decode_is_bit_identical() {
    let fx = Fixture::new();
    let path = fx.path("example.splat");
    write_splat(&path, &samples());

    let loader = CloudLoader::from_fs();
    let a = loader.decode_uncached(&path, &mut NoProgress).unwrap();
    let b = loader.decode_uncached(&path, &mut NoProgress).unwrap();
    let bits = |c: &PointCloud| -> Vec<u32> {
        c.positions()
            .iter()
            .flat_map(|p| p.to_array())
            .chain(c.colors().iter().flat_map(|v| v.to_array()))
            .map(f32::to_bits)
            .collect()
    };
    assert_eq!(bits(&a), bits(&b));
}

//! Shared on-disk fixture for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use repframe::RepFrameConfig;

pub const BASE: &str = "normed_clusttraj";

/// Ten dominant frames over six binary features with a few flipped bits.
pub fn dominant_rows() -> Vec<Vec<f64>> {
    (0..10)
        .map(|i| {
            (0..6)
                .map(|j| {
                    let base = if j < 3 { 1.0 } else { 0.0 };
                    if (i + j) % 7 == 0 { 1.0 - base } else { base }
                })
                .collect()
        })
        .collect()
}

pub fn cluster_one_rows() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        vec![1.0, 1.0, 1.0, 0.0, 0.0, 1.0],
        vec![1.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    ]
}

pub fn cluster_two_rows() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0],
    ]
}

pub fn to_text(rows: &[Vec<f64>]) -> String {
    rows.iter()
        .map(|r| r.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

/// Spread binary rows into continuous values: ones land in [0.6, 0.87],
/// zeros in [0.05, 0.32], so a 0.5 cutoff recovers the binary rows.
pub fn blur(rows: Vec<Vec<f64>>, seed: usize) -> Vec<Vec<f64>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            row.into_iter()
                .enumerate()
                .map(|(j, v)| {
                    let jitter = 0.03 * ((seed + 7 * i + 3 * j) % 10) as f64;
                    if v == 1.0 { 0.6 + jitter } else { 0.05 + jitter }
                })
                .collect()
        })
        .collect()
}

/// Write clusters, the full dataset and a population summary under `root`,
/// and return a config pointing at them.
pub fn write_fixture(root: &Path) -> RepFrameConfig {
    write_fixture_with(root, |rows, _| rows)
}

/// Same layout as [`write_fixture`] with continuous values.
pub fn write_continuous_fixture(root: &Path) -> RepFrameConfig {
    write_fixture_with(root, blur)
}

fn write_fixture_with(
    root: &Path,
    values: impl Fn(Vec<Vec<f64>>, usize) -> Vec<Vec<f64>>,
) -> RepFrameConfig {
    let norm = root.join("v3_norm");
    fs::create_dir_all(&norm).unwrap();

    let c0 = values(dominant_rows(), 0);
    let c1 = values(cluster_one_rows(), 1);
    let c2 = values(cluster_two_rows(), 2);
    fs::write(norm.join(format!("{BASE}.c0")), to_text(&c0)).unwrap();
    fs::write(norm.join(format!("{BASE}.c1")), to_text(&c1)).unwrap();
    fs::write(norm.join(format!("{BASE}.c2")), to_text(&c2)).unwrap();

    let all: Vec<Vec<f64>> = c0.into_iter().chain(c1).chain(c2).collect();
    fs::write(norm.join("normed_data.txt"), to_text(&all)).unwrap();

    let summary = root.join("summary");
    fs::write(
        &summary,
        "#Cluster   Frames     Frac\n       0       10    0.667\n       1        3    0.200\n       2        2    0.133\n",
    )
    .unwrap();

    let mut cfg = RepFrameConfig::default();
    cfg.paths.norm_folder = norm;
    cfg.paths.sim_folder = root.join("sims");
    cfg.paths.summary_file = summary;
    cfg
}

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Run subcommands against a world written to a temporary directory

use clap::Parser;
use isoworld_cli::{Cli, run};
use isoworld_test_utils::{
    ObjectRecord, PackBuilder, SegmentBuilder, WorldFixture, standard_tile, tileset_blob,
};

fn fixture() -> WorldFixture {
    let fixture = WorldFixture::new().expect("fixture");

    let mut damaged = standard_tile(|_| 1);
    damaged.truncate(100);
    fixture
        .write_pack(
            &PackBuilder::new()
                .entry("7.TIL", tileset_blob(&[standard_tile(|_| 1), damaged]))
                .entry("readme.txt", b"hello".to_vec()),
        )
        .expect("pack");

    let block = SegmentBuilder::new()
        .fill_terrain(0x0700)
        .decoration(0, 0, 0x0701)
        .object(vec![
            ObjectRecord::Tile {
                x: 1,
                y: 1,
                height: 1,
                tile: 0x0900,
            },
            ObjectRecord::Padding,
        ])
        .build();
    fixture.write_block(3, -64, 640, &block).expect("block");

    fixture
}

fn run_cli(fixture: &WorldFixture, args: &[&str]) -> anyhow::Result<String> {
    let index = fixture.index_path();
    let data = fixture.data_path();
    let map_root = fixture.map_root();

    let mut argv = vec![
        "isoworld",
        "--pack-index",
        index.to_str().unwrap(),
        "--pack-data",
        data.to_str().unwrap(),
        "--map-root",
        map_root.to_str().unwrap(),
        "--map-id",
        "3",
        "--view-width",
        "96",
        "--view-height",
        "48",
    ];
    argv.extend_from_slice(args);

    let cli = Cli::try_parse_from(argv).expect("arguments parse");
    let mut out = Vec::new();
    run(&cli, &mut out)?;
    Ok(String::from_utf8(out).expect("utf-8 output"))
}

#[test]
fn list_filters_case_insensitively() {
    let fixture = fixture();
    let output = run_cli(&fixture, &["list", "--filter", "TIL"]).expect("list");

    assert!(output.contains("7.til"));
    assert!(!output.contains("readme.txt"));
    assert!(output.ends_with("1 of 2 entries\n"));
}

#[test]
fn extract_writes_entry() {
    let fixture = fixture();
    let target = fixture.root().join("out.txt");
    let output = run_cli(&fixture, &["extract", "README.TXT", target.to_str().unwrap()])
        .expect("extract");

    assert!(output.starts_with("5 bytes written"));
    assert_eq!(std::fs::read(&target).unwrap(), b"hello");
}

#[test]
fn extract_unknown_entry_fails() {
    let fixture = fixture();
    let target = fixture.root().join("out.bin");
    assert!(run_cli(&fixture, &["extract", "nope", target.to_str().unwrap()]).is_err());
    assert!(!target.exists());
}

#[test]
fn tileset_reports_failures() {
    let fixture = fixture();
    let output = run_cli(&fixture, &["tileset", "7"]).expect("tileset");

    assert!(output.starts_with("7.til: 2 tiles, 1 failed"));
    assert!(output.contains("  0 standard  576 opaque"));
    assert!(output.contains("  1 failed"));
}

#[test]
fn block_describes_segment() {
    let fixture = fixture();
    let output = run_cli(&fixture, &["block", "-1", "700"]).expect("block");

    assert!(output.starts_with("block (-64, 640) (7dff7e0a.s32) on map 3"));
    assert!(output.contains("decorations:  1"));
    assert!(output.contains("objects:      1 (1 tiles)"));
    assert!(output.contains("tilesets:     7 9"));
}

#[test]
fn block_missing_file_fails() {
    let fixture = fixture();
    assert!(run_cli(&fixture, &["block", "0", "0"]).is_err());
}

#[test]
fn walk_reports_each_step() {
    let fixture = fixture();
    let output = run_cli(
        &fixture,
        &["walk", "-32", "672", "--dx", "128", "--steps", "1"],
    )
    .expect("walk");

    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("step   0 (-32, 672): +1 -0 blocks"));
    assert!(lines[1].starts_with("step   1 (96, 672): +0 -1 blocks"));
    assert_eq!(lines[2], "totals: 1 loads, 1 evictions, 1 misses, 0 failures");
}

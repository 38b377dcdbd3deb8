use std::fs;
use std::path::PathBuf;

use nes_cartridge::{Cartridge, CartridgeError, DiscreteCartridge, Mirroring, PRG_SMALL};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("nes-cartridge-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn loads_program_from_disk() {
    let path = scratch("prg.bin");
    let mut image = vec![0xEA; PRG_SMALL];
    image[0x3FFC] = 0x00;
    image[0x3FFD] = 0x80;
    fs::write(&path, &image).unwrap();

    let cart = DiscreteCartridge::load_from_files(&path, None, Mirroring::Vertical).unwrap();
    assert_eq!(cart.peek(0xFFFC), 0x00);
    assert_eq!(cart.peek(0xFFFD), 0x80);
    assert_eq!(cart.peek(0xBFFD), 0x80);
    assert!(cart.chr().is_empty());
    fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let path = scratch("does-not-exist.bin");
    let err = DiscreteCartridge::load_from_files(&path, None, Mirroring::Horizontal).unwrap_err();
    match &err {
        CartridgeError::NotFound { path: p } => assert_eq!(p, &path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("does-not-exist.bin"));
}

#[test]
fn bad_character_file_is_rejected() {
    let prg = scratch("ok-prg.bin");
    let chr = scratch("short-chr.bin");
    fs::write(&prg, vec![0; PRG_SMALL]).unwrap();
    fs::write(&chr, vec![0; 100]).unwrap();
    let err = DiscreteCartridge::load_from_files(&prg, Some(&chr), Mirroring::Horizontal)
        .unwrap_err();
    assert_eq!(err.to_string(), "character ROM has an illegal size of 100 bytes");
    fs::remove_file(prg).unwrap();
    fs::remove_file(chr).unwrap();
}

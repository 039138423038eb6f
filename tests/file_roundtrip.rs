use std::fs;

use huffpack::{Error, compress, decompress, derive_output_name};
use tempfile::tempdir;

fn round_trip(data: &[u8]) -> Vec<u8> {
    let dir = tempdir().unwrap();
    let original = dir.path().join("input.dat");
    let packed = derive_output_name(&original);
    let restored = dir.path().join("restored.dat");
    fs::write(&original, data).unwrap();

    let report = compress(&original, &packed).unwrap();
    assert_eq!(report.input_bytes, data.len() as u64);
    assert_eq!(report.output_bytes, fs::metadata(&packed).unwrap().len());

    let back = decompress(&packed, &restored).unwrap();
    assert_eq!(back.output_bytes, data.len() as u64);
    fs::read(&restored).unwrap()
}

#[test]
fn text_file_round_trip() {
    let text = "It was the best of times, it was the worst of times, it was the age of wisdom, \
                it was the age of foolishness...\n"
        .repeat(40);
    assert_eq!(round_trip(text.as_bytes()), text.as_bytes());
}

#[test]
fn binary_file_with_every_byte_value() {
    let data: Vec<u8> = (0..20_000u32).map(|i| (i * 31 % 256) as u8).collect();
    assert_eq!(round_trip(&data), data);
}

#[test]
fn empty_file_round_trip() {
    assert!(round_trip(b"").is_empty());
}

#[test]
fn repeated_single_byte_round_trip() {
    let data = vec![b'\\'; 9_999];
    assert_eq!(round_trip(&data), data);
}

#[test]
fn skewed_input_compresses() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("skewed.txt");
    let packed = dir.path().join("skewed.huff");
    let mut data = vec![b'a'; 50_000];
    data.extend_from_slice(b"bcdefg");
    fs::write(&original, &data).unwrap();

    let report = compress(&original, &packed).unwrap();
    assert!(report.ratio() < 0.2);
    assert_eq!(report.symbols, 7);
}

#[test]
fn missing_input_creates_no_output() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let packed = dir.path().join("nope.huff");

    let err = compress(&missing, &packed).unwrap_err();
    assert!(matches!(err, Error::InputUnreadable { .. }));
    assert!(!packed.exists());
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("input.txt");
    fs::write(&original, b"hello").unwrap();
    let target = dir.path().join("no_such_dir").join("out.huff");

    let err = compress(&original, &target).unwrap_err();
    assert!(matches!(err, Error::OutputUnwritable { .. }));
}

#[test]
fn corrupt_container_leaves_no_partial_output() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("input.txt");
    let packed = dir.path().join("input.huff");
    let restored = dir.path().join("restored.txt");
    fs::write(&original, b"mississippi river").unwrap();
    compress(&original, &packed).unwrap();

    let mut bytes = fs::read(&packed).unwrap();
    bytes.truncate(4);
    fs::write(&packed, &bytes).unwrap();

    let err = decompress(&packed, &restored).unwrap_err();
    assert!(matches!(err, Error::Truncated(_)));
    assert!(!restored.exists());
}

#[test]
fn failure_on_one_file_does_not_affect_the_next() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.txt");
    fs::write(&good, b"still fine").unwrap();

    let bad = dir.path().join("bad.txt");
    assert!(compress(&bad, &derive_output_name(&bad)).is_err());
    assert!(compress(&good, &derive_output_name(&good)).is_ok());
    assert!(dir.path().join("good.huff").exists());
}

#[test]
fn inspect_reads_header_and_tree() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("abc.txt");
    let packed = dir.path().join("abc.huff");
    fs::write(&original, b"AABAC").unwrap();
    compress(&original, &packed).unwrap();

    let inspection = huffpack::inspect(&packed).unwrap();
    assert_eq!(inspection.header.padding_bits, 1);
    assert_eq!(inspection.header.tree_len, 5);
    assert_eq!(inspection.payload_bytes, 1);
}

#[test]
fn compressing_onto_itself_is_refused() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("data.huff");
    fs::write(&input, b"precious user data").unwrap();

    let target = derive_output_name(&input);
    assert_eq!(target, input);
    let err = compress(&input, &target).unwrap_err();
    assert!(matches!(err, Error::SameFile { .. }));
    assert_eq!(fs::read(&input).unwrap(), b"precious user data");
}

#[test]
fn decompressing_onto_itself_keeps_the_container() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("notes.txt");
    let packed = dir.path().join("notes.huff");
    fs::write(&original, b"keep me around").unwrap();
    compress(&original, &packed).unwrap();
    let before = fs::read(&packed).unwrap();

    // Same file reached through a different spelling of the path.
    let alias = dir.path().join(".").join("notes.huff");
    let err = decompress(&packed, &alias).unwrap_err();
    assert!(matches!(err, Error::SameFile { .. }));
    assert_eq!(fs::read(&packed).unwrap(), before);
}

#[test]
fn directory_input_is_unreadable() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("dir.huff");

    let err = compress(dir.path(), &output).unwrap_err();
    assert!(matches!(err, Error::InputUnreadable { .. }));
    assert!(!output.exists());
}

#[cfg(unix)]
#[test]
fn hard_link_to_input_is_refused() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("linked.txt");
    let link = dir.path().join("linked.huff");
    fs::write(&input, b"two names, one file").unwrap();
    fs::hard_link(&input, &link).unwrap();

    let err = compress(&input, &link).unwrap_err();
    assert!(matches!(err, Error::SameFile { .. }));
    assert_eq!(fs::read(&input).unwrap(), b"two names, one file");
}

//! Integration tests for symbol selection and encoding
//!
//! These tests pin the version/level chosen for known inputs, the error
//! reported for contradictory options, and structural properties that must
//! hold for any content.

use proptest::prelude::*;
use rust_qrgen::encoder::function_mask::FunctionMask;
use rust_qrgen::encoder::mask::penalty_score;
use rust_qrgen::encoder::tables::ec_block_info;
use rust_qrgen::{ECLevel, EncodeOptions, Mode, QRCode, QrError, Version, make, make_micro, make_qr};

#[test]
fn test_codeword_totals_for_all_symbols() {
    for version in Version::ascending() {
        let levels: Vec<Option<ECLevel>> = if version.error_levels().is_empty() {
            vec![None]
        } else {
            version.error_levels().iter().copied().map(Some).collect()
        };
        for level in levels {
            let info = ec_block_info(version, level)
                .unwrap_or_else(|| panic!("missing table entry for {version} {level:?}"));
            assert_eq!(
                info.data_codewords + info.ecc_codewords(),
                info.total_codewords,
                "{version} {level:?}"
            );
            if !version.is_micro() {
                let func = FunctionMask::new(version);
                assert_eq!(func.data_modules_count() / 8, info.total_codewords);
            }
        }
    }
}

#[test]
fn test_empty_content_is_m1() {
    let qr = make("", &EncodeOptions::new()).unwrap();
    assert_eq!(qr.version, Version::Micro(1));
    assert_eq!(qr.error_correction, None);
    assert_eq!(qr.size(), 11);
    assert!(qr.segments.is_empty());
    assert!(qr.modules.count_dark() > 0);
}

#[test]
fn test_empty_content_full_symbol() {
    let qr = make_qr("", &EncodeOptions::new()).unwrap();
    assert_eq!(qr.designator(), "1-M");
}

#[test]
fn test_numeric_scenarios() {
    let qr = make("12345", &EncodeOptions::new()).unwrap();
    assert_eq!(qr.designator(), "M1");
    assert_eq!(qr.version_number(), -4);

    let qr = make("01234567", &EncodeOptions::new()).unwrap();
    assert_eq!(qr.designator(), "M2-M");
    assert_eq!(qr.mode(), Some(Mode::Numeric));

    let qr = make_qr("01234567", &EncodeOptions::new()).unwrap();
    assert_eq!(qr.designator(), "1-M");
}

#[test]
fn test_explicit_level_skips_m1() {
    let qr = make("12345", &EncodeOptions::new().error(ECLevel::L)).unwrap();
    assert_eq!(qr.designator(), "M2-L");
}

#[test]
fn test_capacity_boundary_40_l() {
    let options = EncodeOptions::new().error(ECLevel::L);
    let qr = make("a".repeat(2953).as_str(), &options).unwrap();
    assert_eq!(qr.designator(), "40-L");
    assert_eq!(qr.size(), 177);

    let result = make("a".repeat(2954).as_str(), &options);
    assert!(matches!(result, Err(QrError::DataOverflow(_))));

    let qr = make("7".repeat(7089).as_str(), &options).unwrap();
    assert_eq!(qr.designator(), "40-L");
    let result = make("7".repeat(7090).as_str(), &options);
    assert!(matches!(result, Err(QrError::DataOverflow(_))));
}

#[test]
fn test_forced_kanji_rejects_latin() {
    let result = make("点abc", &EncodeOptions::new().mode(Mode::Kanji));
    assert!(matches!(result, Err(QrError::Mode(_))));
}

#[test]
fn test_kanji_content() {
    let qr = make("点茗", &EncodeOptions::new()).unwrap();
    assert_eq!(qr.mode(), Some(Mode::Kanji));
    assert_eq!(qr.segments[0].data(), &[0x93, 0x5F, 0xE4, 0xAA]);
    assert_eq!(qr.segments[0].char_count(), 2);
}

#[test]
fn test_m1_with_level_rejected() {
    let options = EncodeOptions::new()
        .version(Version::Micro(1))
        .error(ECLevel::L);
    assert!(matches!(make("1", &options), Err(QrError::ErrorLevel(_))));
}

#[test]
fn test_h_with_micro_rejected() {
    let result = make_micro("1", &EncodeOptions::new().error(ECLevel::H));
    assert!(matches!(result, Err(QrError::ErrorLevel(_))));
}

#[test]
fn test_version_and_micro_conflict() {
    let options = EncodeOptions::new().version(Version::Micro(2));
    assert!(matches!(make_qr("1", &options), Err(QrError::Version(_))));
}

#[test]
fn test_explicit_version_too_small() {
    let options = EncodeOptions::new().version(Version::Model2(1));
    let result = make("a".repeat(100).as_str(), &options);
    match result {
        Err(QrError::DataOverflow(msg)) => assert!(msg.contains("version")),
        other => panic!("expected overflow, got {other:?}"),
    }
}

#[test]
fn test_eci_designator_on_first_byte_segment() {
    let options = EncodeOptions::new().eci(true);
    let qr = make("Größe €", &options).unwrap();
    assert!(!qr.is_micro());
    let designators: Vec<u32> = qr.segments.iter().filter_map(|s| s.eci()).collect();
    assert_eq!(designators, vec![26]);
    let first_byte = qr.segments.iter().find(|s| s.mode() == Mode::Byte).unwrap();
    assert_eq!(first_byte.encoding(), Some("utf-8"));
    assert_eq!(first_byte.eci(), Some(26));
}

#[test]
fn test_latin1_without_eci_header() {
    let qr = make("Grüße", &EncodeOptions::new().eci(true)).unwrap();
    assert!(qr.segments.iter().all(|s| s.eci().is_none()));
}

#[test]
fn test_unknown_encoding() {
    let result = make("abc", &EncodeOptions::new().encoding("klingon"));
    assert!(matches!(result, Err(QrError::Encoding(_))));
}

#[test]
fn test_binary_content() {
    let data: Vec<u8> = (0..=255).collect();
    let qr = make(data.clone(), &EncodeOptions::new()).unwrap();
    let joined: Vec<u8> = qr.segments.iter().flat_map(|s| s.data().to_vec()).collect();
    assert_eq!(joined, data);
}

#[test]
fn test_mixed_content_segments() {
    let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789012345678901234567890123456789abc";
    let qr = make(text, &EncodeOptions::new()).unwrap();
    let modes: Vec<Mode> = qr.segments.iter().map(|s| s.mode()).collect();
    assert!(modes.contains(&Mode::Numeric));
    assert!(modes.contains(&Mode::Byte));
}

#[test]
fn test_mask_is_lowest_best() {
    let text = "Mask selection test 0123456789";
    let qr = make_qr(text, &EncodeOptions::new()).unwrap();
    let scores: Vec<i32> = (0..8)
        .map(|m| {
            let fixed = make_qr(text, &EncodeOptions::new().mask(m)).unwrap();
            penalty_score(&fixed.modules)
        })
        .collect();
    let best = scores.iter().copied().min().unwrap();
    let first = scores.iter().position(|&s| s == best).unwrap();
    assert_eq!(qr.mask as usize, first);
}

#[test]
fn test_boost_error() {
    let qr = make_qr("1", &EncodeOptions::new().boost_error(true)).unwrap();
    assert_eq!(qr.designator(), "1-H");
}

fn assert_rows(qr: &QRCode, expected: &[&str]) {
    let rows: Vec<String> = qr
        .rows()
        .iter()
        .map(|row| row.iter().map(|&dark| if dark { '1' } else { '0' }).collect())
        .collect();
    assert_eq!(rows, expected, "{}", qr.designator());
}

/// Unmask the data modules and read them back in placement order
fn read_data_bits(qr: &QRCode) -> Vec<bool> {
    let func = FunctionMask::new(qr.version);
    let pattern = qr.mask_pattern();
    let size = qr.size();
    let mut bits = Vec::new();
    let mut upward = true;
    let mut col = size - 1;
    while col > 0 {
        if !qr.is_micro() && col == 6 {
            col -= 1;
        }
        for step in 0..size {
            let y = if upward { size - 1 - step } else { step };
            for x in [col, col - 1] {
                if !func.is_function(x, y) {
                    bits.push(qr.get(x, y) ^ pattern.is_masked(y, x));
                }
            }
        }
        upward = !upward;
        col = col.saturating_sub(2);
    }
    bits
}

fn codeword_bits(codewords: &[u8], half: Option<usize>) -> Vec<bool> {
    let mut bits = Vec::new();
    for (i, &byte) in codewords.iter().enumerate() {
        let width = if Some(i) == half { 4 } else { 8 };
        bits.extend((8 - width..8).rev().map(|b| (byte >> b) & 1 == 1));
    }
    bits
}

#[test]
fn test_known_symbol_1_m() {
    let options = EncodeOptions::new()
        .version(Version::Model2(1))
        .error(ECLevel::M)
        .mask(2);
    let qr = make("01234567", &options).unwrap();
    let codewords = [
        0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
        0x11, 0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55,
    ];
    assert_eq!(read_data_bits(&qr), codeword_bits(&codewords, None));
    assert_rows(
        &qr,
        &[
            "111111100101101111111",
            "100000100111101000001",
            "101110101000001011101",
            "101110101100001011101",
            "101110101011101011101",
            "100000101000101000001",
            "111111101010101111111",
            "000000001001100000000",
            "101111100100101111100",
            "000101011010100101100",
            "001000110101010011111",
            "000010000100000111100",
            "000111111001010010000",
            "000000001011111001100",
            "111111100110101100000",
            "100000101011111000101",
            "101110101000100101100",
            "101110101100100100000",
            "101110101011010010100",
            "100000100000000110110",
            "111111101111010010100",
        ],
    );
}

#[test]
fn test_known_symbol_m2_l() {
    let options = EncodeOptions::new()
        .version(Version::Micro(2))
        .error(ECLevel::L)
        .mask(1);
    let qr = make("01234567", &options).unwrap();
    let codewords = [0x40, 0x18, 0xAC, 0xC3, 0x00, 0x86, 0x0D, 0x22, 0xAE, 0x30];
    assert_eq!(read_data_bits(&qr), codeword_bits(&codewords, None));
    assert_rows(
        &qr,
        &[
            "1111111010101",
            "1000001011101",
            "1011101001101",
            "1011101001111",
            "1011101011100",
            "1000001010001",
            "1111111001111",
            "0000000001100",
            "1101000010001",
            "0110101010101",
            "1110011111110",
            "0001010000110",
            "1110100110111",
        ],
    );
}

#[test]
fn test_known_symbol_m3_l_half_codeword() {
    // No level given: M3-M is too small, so M3-L is used
    let options = EncodeOptions::new().version(Version::Micro(3)).mask(3);
    let qr = make("Wikipedia", &options).unwrap();
    assert_eq!(qr.designator(), "M3-L");
    let codewords = [
        0xA5, 0x5D, 0xA5, 0xAD, 0xA5, 0xC1, 0x95, 0x91, 0xA5, 0x84, 0x00, 0xD1, 0xCC, 0x18, 0xF8,
        0x1A, 0x56,
    ];
    let bits = read_data_bits(&qr);
    assert_eq!(bits.len(), 84 + 48);
    assert_eq!(bits, codeword_bits(&codewords, Some(10)));
    assert_rows(
        &qr,
        &[
            "111111101010101",
            "100000101110101",
            "101110100010101",
            "101110100101100",
            "101110100100001",
            "100000100101010",
            "111111101001100",
            "000000000010110",
            "111110010111111",
            "011011001111000",
            "101110001011101",
            "001111011000101",
            "111010111011111",
            "001111011010001",
            "101110000000101",
        ],
    );
}

#[test]
fn test_explicit_version_falls_back_to_l() {
    let options = EncodeOptions::new().version(Version::Model2(1));
    let qr = make("abcdefghijklmnop", &options).unwrap();
    assert_eq!(qr.designator(), "1-L");
    let qr = make("abcdefghijklmn", &options).unwrap();
    assert_eq!(qr.designator(), "1-M");
    let result = make("abcdefghijklmnop", &options.clone().error(ECLevel::M));
    assert!(matches!(result, Err(QrError::DataOverflow(_))));
}

#[test]
fn test_out_of_range_version_rejected() {
    for version in [Version::Micro(0), Version::Micro(9), Version::Model2(41)] {
        let options = EncodeOptions::new().version(version).mode(Mode::Numeric);
        assert!(matches!(make("1", &options), Err(QrError::Version(_))), "{version:?}");
    }
}

#[test]
fn test_eci_without_byte_content_allows_micro() {
    let options = EncodeOptions::new().encoding("utf-8").eci(true);
    let qr = make("123", &options).unwrap();
    assert_eq!(qr.designator(), "M1");
    assert!(make_micro("123", &options).is_ok());
}

proptest! {
    #[test]
    fn prop_encoding_is_idempotent(text in "\\PC{0,120}") {
        let options = EncodeOptions::new();
        let a = make(text.as_str(), &options).unwrap();
        let b = make(text.as_str(), &options).unwrap();
        prop_assert_eq!(a.rows(), b.rows());
        prop_assert_eq!(a.mask, b.mask);
    }

    #[test]
    fn prop_matrix_side_matches_version(data in proptest::collection::vec(any::<u8>(), 0..400)) {
        let qr = make(data, &EncodeOptions::new()).unwrap();
        prop_assert_eq!(qr.size(), qr.version.size());
        let expected = match qr.version {
            Version::Micro(n) => 2 * n as usize + 9,
            Version::Model2(n) => 4 * n as usize + 17,
        };
        prop_assert_eq!(qr.size(), expected);
    }

    #[test]
    fn prop_ascii_segments_concatenate(text in "[ -~]{0,200}") {
        let qr = make(text.as_str(), &EncodeOptions::new()).unwrap();
        let joined: Vec<u8> = qr.segments.iter().flat_map(|s| s.data().to_vec()).collect();
        prop_assert_eq!(joined, text.into_bytes());
    }

    #[test]
    fn prop_numeric_is_one_segment(digits in "[0-9]{1,300}") {
        let qr = make(digits.as_str(), &EncodeOptions::new()).unwrap();
        prop_assert_eq!(qr.mode(), Some(Mode::Numeric));
        prop_assert_eq!(qr.segments[0].char_count(), digits.len());
    }
}

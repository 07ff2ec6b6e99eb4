use std::fs;
use std::path::Path;

use resume_pdf::fonts;
use resume_pdf::{generate, render_resume, Config};
use sha2::{Digest, Sha256};

const SAMPLE: &str = r#"
name: Jane Doe
heading: Software Engineer
sections:
  experiences:
    - company: Acme
      title: SWE
      start_date: 2020
      end_date: 2022
      highlights:
        - Built X
        - Shipped Y
  education:
    - institution: MIT
      degree: BSc
  skills:
    - title: Languages
      content: Rust, Python
"#;

fn sample_config(dir: &Path) -> Option<Config> {
    let config = Config::new(dir.join("resume.yaml"));
    if !fonts::fonts_available(config.fonts_dir.as_deref(), &config.font_family) {
        eprintln!(
            "Skipping: no fonts found. Set {} to a directory with {}-Regular.ttf and {}-Bold.ttf.",
            fonts::FONTS_DIR_ENV,
            config.font_family,
            config.font_family
        );
        return None;
    }
    fs::write(&config.input, SAMPLE).expect("write sample resume");
    Some(config)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() && data[cursor] != terminator {
                    if terminator == b')'
                        || !matches!(data[cursor], b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t')
                    {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while let Some(start_pos) = data[offset..]
            .windows(start.len())
            .position(|window| window == start)
        {
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    let literal_tags: [&[u8]; 3] = [b"/CreationDate(", b"/ModDate(", b"/Producer("];
    for tag in literal_tags {
        scrub_segment(&mut normalized, tag, b')');
    }
    scrub_segment(&mut normalized, b"/ID[", b']');
    let xml_tags: [(&[u8], &[u8]); 6] = [
        (b"<xmp:CreateDate>", b"</xmp:CreateDate>"),
        (b"<xmp:ModifyDate>", b"</xmp:ModifyDate>"),
        (b"<xmp:MetadataDate>", b"</xmp:MetadataDate>"),
        (b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>"),
        (b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>"),
        (b"<xmpMM:VersionID>", b"</xmpMM:VersionID>"),
    ];
    for (start, end) in xml_tags {
        scrub_xml(&mut normalized, start, end);
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_a_pdf() {
    let dir = tempfile::tempdir().expect("temp dir");
    let Some(config) = sample_config(dir.path()) else {
        return;
    };

    let pdf = render_resume(&config).expect("render resume");
    assert!(pdf.bytes.starts_with(b"%PDF"), "output should be a PDF");
}

#[test]
fn rendering_is_deterministic() {
    let dir = tempfile::tempdir().expect("temp dir");
    let Some(config) = sample_config(dir.path()) else {
        return;
    };

    let first = render_resume(&config).expect("render resume").bytes;
    let second = render_resume(&config).expect("render resume").bytes;

    assert_eq!(first.len(), second.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first),
        normalized_hash(&second),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn generate_writes_next_to_the_input() {
    let dir = tempfile::tempdir().expect("temp dir");
    let Some(config) = sample_config(dir.path()) else {
        return;
    };

    let output = generate(&config).expect("generate resume");

    assert_eq!(output, dir.path().join("resume.pdf"));
    let bytes = fs::read(&output).expect("read output");
    assert!(bytes.starts_with(b"%PDF"));
    assert!(!dir.path().join("resume.pdf.partial").exists());
}

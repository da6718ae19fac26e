use chardet::detect;
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

use super::error::AttemptError;
use super::Representation;

/// XBRL instance documents live under `XBRL/PublicDoc/`; the archive also
/// carries audit-report instances that must not be picked up.
const PUBLIC_DOC_FRAGMENT: &str = "PublicDoc";

/// Payload of the first archive entry matching the requested
/// representation. Tabular payloads stay as raw bytes plus the detected
/// encoding so the CSV layer can decode them; tagged payloads are decoded
/// here.
#[derive(Debug)]
pub enum Payload {
    Tabular { bytes: Vec<u8>, encoding: String },
    Tagged { text: String },
}

#[derive(Debug)]
pub struct ExtractedEntry {
    pub name: String,
    pub payload: Payload,
}

fn entry_matches(name: &str, representation: Representation) -> bool {
    match representation {
        Representation::Tabular => name.ends_with(".csv"),
        Representation::Tagged => {
            name.ends_with(".xbrl") && name.contains(PUBLIC_DOC_FRAGMENT)
        }
    }
}

/// Decode `bytes` with the encoding chardet detected for them. Detection
/// is treated as a capability, not second-guessed; an unrecognized label
/// falls back to UTF-8 inside `encoding_rs`.
pub fn decode_payload(bytes: &[u8]) -> Result<(String, String), AttemptError> {
    let charenc = detect(bytes).0;
    log::debug!("Detected character encoding: {}", charenc);

    let mut reader = DecodeReaderBytesBuilder::new()
        .encoding(Encoding::for_label(charenc.as_bytes()))
        .build(Cursor::new(bytes));

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| AttemptError::PayloadDecode {
            encoding: charenc.clone(),
            source: e,
        })?;
    Ok((text, charenc))
}

/// Validate `raw` as a zip container and pull out the first entry matching
/// `representation`. The buffer is owned for the duration of the call and
/// dropped on every path; nothing is materialized on disk.
pub fn extract_entry(
    raw: &[u8],
    representation: Representation,
) -> Result<ExtractedEntry, AttemptError> {
    let mut archive =
        ZipArchive::new(Cursor::new(raw)).map_err(AttemptError::CorruptArchive)?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(AttemptError::CorruptArchive)?;
        let name = entry.name().to_string();
        if !entry_matches(&name, representation) {
            continue;
        }

        log::debug!("Extracting archive entry: {}", name);
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| AttemptError::CorruptArchive(ZipError::Io(e)))?;

        let payload = match representation {
            Representation::Tabular => {
                let encoding = detect(&bytes).0;
                log::debug!("Detected character encoding: {}", encoding);
                Payload::Tabular { bytes, encoding }
            }
            Representation::Tagged => {
                let (text, _) = decode_payload(&bytes)?;
                Payload::Tagged { text }
            }
        };
        return Ok(ExtractedEntry { name, payload });
    }

    Err(AttemptError::NoMatchingEntry(representation))
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command implementations. Each reads its inputs, runs the engine, and writes
// its outputs; printing is left to `main`.

use std::fmt;
use std::path::Path;

use pagewerk_core::error::Result;
use pagewerk_core::integrity::hash_bytes;
use pagewerk_core::types::{PageRange, Rotation};
use pagewerk_core::EditorConfig;
use pagewerk_document::{CodecOptions, SourceDocument, check_input_size};
use pagewerk_session::SharedSession;
use tracing::{info, instrument};

use crate::script::EditScript;

/// Summary printed by `pagewerk info`.
#[derive(Debug)]
pub struct DocumentInfo {
    pub bytes: usize,
    pub fingerprint: String,
    pub rotations: Vec<Rotation>,
}

impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pages:       {}", self.rotations.len())?;
        writeln!(f, "size:        {} bytes", self.bytes)?;
        writeln!(f, "sha256:      {}", self.fingerprint)?;
        let turned: Vec<String> = self
            .rotations
            .iter()
            .enumerate()
            .filter(|(_, rotation)| !rotation.is_zero())
            .map(|(index, rotation)| format!("{}={rotation}", index + 1))
            .collect();
        if turned.is_empty() {
            write!(f, "rotated:     none")
        } else {
            write!(f, "rotated:     {}", turned.join(", "))
        }
    }
}

#[instrument(skip_all, fields(input = %input.display()))]
pub fn info(input: &Path, config: &EditorConfig) -> Result<DocumentInfo> {
    let options = CodecOptions::from(config);
    let bytes = read_input(input, &options)?;
    let source = SourceDocument::load(&bytes, &options)?;
    Ok(DocumentInfo {
        bytes: bytes.len(),
        fingerprint: hash_bytes(&bytes),
        rotations: source.rotations(),
    })
}

/// Replay `script` against `input` and write the rebuilt result. Returns the
/// page count of the output.
#[instrument(skip_all, fields(input = %input.display(), script = %script.display()))]
pub async fn edit(input: &Path, script: &Path, output: &Path, config: &EditorConfig) -> Result<usize> {
    let edits = EditScript::load(script)?;
    let bytes = std::fs::read(input)?;
    let session = SharedSession::ingest(bytes, config.clone()).await?;

    let base_dir = script.parent().unwrap_or_else(|| Path::new("."));
    edits.run(&session, base_dir).await?;

    let result = session.rebuild().await?;
    std::fs::write(output, &result)?;
    let pages = session.page_count().await;
    info!(pages, output = %output.display(), "edited document written");
    Ok(pages)
}

#[instrument(skip_all, fields(inputs = inputs.len()))]
pub fn merge(inputs: &[impl AsRef<Path>], output: &Path, config: &EditorConfig) -> Result<()> {
    let options = CodecOptions::from(config);
    let sources = inputs
        .iter()
        .map(|path| read_input(path.as_ref(), &options))
        .collect::<Result<Vec<_>>>()?;
    let merged = pagewerk_document::merge(sources.as_slice(), &options)?;
    std::fs::write(output, merged)?;
    info!(output = %output.display(), "merged document written");
    Ok(())
}

#[instrument(skip_all, fields(input = %input.display()))]
pub fn split(input: &Path, range: PageRange, output: &Path, config: &EditorConfig) -> Result<()> {
    let options = CodecOptions::from(config);
    let bytes = read_input(input, &options)?;
    let part = pagewerk_document::split(&bytes, range, &options)?;
    std::fs::write(output, part)?;
    info!(output = %output.display(), "page range written");
    Ok(())
}

#[instrument(skip_all, fields(input = %input.display()))]
pub fn split_at(input: &Path, after: u32, first: &Path, second: &Path, config: &EditorConfig) -> Result<()> {
    let options = CodecOptions::from(config);
    let bytes = read_input(input, &options)?;
    let (head, tail) = pagewerk_document::split_at(&bytes, after, &options)?;
    std::fs::write(first, head)?;
    std::fs::write(second, tail)?;
    info!(first = %first.display(), second = %second.display(), "halves written");
    Ok(())
}

fn read_input(path: &Path, options: &CodecOptions) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    check_input_size(&bytes, options)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use pagewerk_core::PagewerkError;
    use pagewerk_document::fixtures;

    use super::*;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn info_reports_rotations() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "in.pdf", &fixtures::sample_pdf_with_rotations(&[0, 90]));
        let info = info(&input, &EditorConfig::default()).unwrap();
        assert_eq!(info.rotations, vec![Rotation::ZERO, Rotation::QUARTER]);
        let printed = info.to_string();
        assert!(printed.contains("pages:       2"));
        assert!(printed.contains("2=90"));
    }

    #[test]
    fn merge_and_split_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.pdf", &fixtures::sample_pdf(2));
        let b = write(dir.path(), "b.pdf", &fixtures::sample_pdf(3));
        let merged = dir.path().join("merged.pdf");
        let config = EditorConfig::default();

        merge(&[&a, &b], &merged, &config).unwrap();
        let bytes = std::fs::read(&merged).unwrap();
        assert_eq!(fixtures::page_markers(&bytes), vec![0, 1, 0, 1, 2]);

        let part = dir.path().join("part.pdf");
        split(&merged, PageRange::new(2, 3), &part, &config).unwrap();
        assert_eq!(fixtures::page_markers(&std::fs::read(&part).unwrap()), vec![1, 0]);

        let (first, second) = (dir.path().join("1.pdf"), dir.path().join("2.pdf"));
        split_at(&merged, 4, &first, &second, &config).unwrap();
        assert_eq!(fixtures::page_markers(&std::fs::read(&first).unwrap()).len(), 4);
        assert_eq!(fixtures::page_markers(&std::fs::read(&second).unwrap()), vec![2]);
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = info(&dir.path().join("absent.pdf"), &EditorConfig::default()).unwrap_err();
        assert!(matches!(err, PagewerkError::Io(_)));
    }

    #[tokio::test]
    async fn edit_writes_the_rebuilt_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "in.pdf", &fixtures::sample_pdf(3));
        let script = write(
            dir.path(),
            "edit.json",
            br#"{ "steps": [
                { "op": "rotate", "pages": [3], "degrees": 90 },
                { "op": "text", "placement": { "page": 3, "x": 30, "y": 30 }, "text": "Filed" },
                { "op": "move", "from": 3, "to": 1 }
            ] }"#,
        );
        let output = dir.path().join("out.pdf");

        let pages = edit(&input, &script, &output, &EditorConfig::default()).await.unwrap();
        assert_eq!(pages, 3);
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(fixtures::page_markers(&bytes), vec![2, 0, 1]);
        assert_eq!(fixtures::page_rotations(&bytes), vec![90, 0, 0]);
    }
}

//! Entry formatters and output rendering
//!
//! A formatter maps one matched file to one newline-terminated line of
//! generated text. The renderer concatenates those lines in file-set order;
//! it adds no separators of its own.

use std::path::Path;

use crate::error::{GenError, GenResult};
use crate::relpath::relative_import_path;

/// Pure function producing one output line per matched file.
pub type Formatter = fn(&Path, &Path) -> GenResult<String>;

/// Extension table consulted when the caller supplies no formatter.
/// Resolved once at configuration time; first match wins.
const FORMATTERS: &[(&[&str], Formatter)] = &[
    (&["ts", "tsx", "js", "jsx"], import_statement),
    (&["css", "scss"], stylesheet_import),
];

/// Pick a built-in formatter from the output file's extension.
pub fn formatter_for(out_file: &Path) -> Option<Formatter> {
    let ext = out_file.extension()?.to_str()?;
    FORMATTERS
        .iter()
        .find(|(exts, _)| exts.contains(&ext))
        .map(|(_, f)| *f)
}

/// `import './a';` style entry. A trailing `.ts`/`.tsx` is stripped so the
/// emitted specifier is extensionless; other extensions are kept as-is.
pub fn import_statement(file: &Path, out_file: &Path) -> GenResult<String> {
    let rel = relative_import_path(file, out_file)?;
    let rel = rel
        .strip_suffix(".tsx")
        .or_else(|| rel.strip_suffix(".ts"))
        .unwrap_or(&rel);
    Ok(format!("import '{rel}';\n"))
}

/// `@import './a.scss';` style entry. The extension is retained.
pub fn stylesheet_import(file: &Path, out_file: &Path) -> GenResult<String> {
    let rel = relative_import_path(file, out_file)?;
    Ok(format!("@import '{rel}';\n"))
}

/// Render the full output text for the current file set.
///
/// Files whose formatter fails with an unsupported-layout error are skipped;
/// their errors are returned alongside the text so the caller can report
/// them without aborting the regeneration step.
pub fn render(files: &[std::path::PathBuf], formatter: Formatter, out_file: &Path) -> (String, Vec<GenError>) {
    let mut output = String::new();
    let mut skipped = Vec::new();

    for file in files {
        match formatter(file, out_file) {
            Ok(line) => output.push_str(&line),
            Err(err) => skipped.push(err),
        }
    }

    (output, skipped)
}

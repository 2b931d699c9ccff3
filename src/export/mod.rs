//! Writing rendered receipts to disk.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::core::Receipt;
use crate::presentation::ReceiptView;

/// Errors that can occur while exporting a receipt.
#[derive(Debug)]
pub enum ExportError {
    /// Another export is still in flight.
    Busy,
    /// The renderer could not produce a document.
    Render(String),
    /// The receipt number cannot be used as a file name.
    UnsafeName(String),
    /// The document could not be written.
    Io(std::io::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Busy => write!(f, "an export is already in progress"),
            ExportError::Render(e) => write!(f, "rendering failed: {e}"),
            ExportError::UnsafeName(n) => {
                write!(f, "receipt number '{n}' is not a valid file name")
            }
            ExportError::Io(e) => write!(f, "writing document failed: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Turns a receipt view into a single-page document.
///
/// An image based PDF backend implements this with the `pdf` extension.
pub trait DocumentRenderer {
    /// File extension of produced documents, without the dot.
    fn extension(&self) -> &str;
    /// Renders the whole document in memory.
    fn render(&self, view: &ReceiptView) -> Result<Vec<u8>, ExportError>;
}

/// `receipt_<number>.<ext>`
pub fn file_name(receipt: &Receipt, extension: &str) -> String {
    format!("receipt_{}.{extension}", receipt.receipt_number)
}

/// Path of the exported document, which must sit directly inside `dir`.
pub fn document_path(
    dir: &Path,
    receipt: &Receipt,
    extension: &str,
) -> Result<PathBuf, ExportError> {
    let number = &receipt.receipt_number;
    if number.contains(['/', '\\']) || number.contains("..") {
        return Err(ExportError::UnsafeName(number.clone()));
    }
    let path = dir.join(file_name(receipt, extension));
    if path.parent() != Some(dir) {
        return Err(ExportError::UnsafeName(number.clone()));
    }
    Ok(path)
}

/// Exports one receipt at a time through a renderer.
pub struct Exporter<R> {
    renderer: R,
    busy: Cell<bool>,
}

/// Clears the busy flag when dropped.
pub struct BusyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

impl<R: DocumentRenderer> Exporter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            busy: Cell::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Marks an export as started. Fails instead of queueing when one is running.
    pub fn begin(&self) -> Result<BusyGuard<'_>, ExportError> {
        if self.busy.replace(true) {
            return Err(ExportError::Busy);
        }
        Ok(BusyGuard { flag: &self.busy })
    }

    /// Renders `receipt` and writes it into `dir`, returning the written path.
    ///
    /// Nothing is left on disk when rendering or writing fails.
    pub fn export(&self, receipt: &Receipt, dir: &Path) -> Result<PathBuf, ExportError> {
        let _guard = self.begin().inspect_err(|_| {
            warn!(receipt_number = %receipt.receipt_number, "Export already in progress");
        })?;
        let result = document_path(dir, receipt, self.renderer.extension()).and_then(|path| {
            let bytes = self.renderer.render(&ReceiptView::new(receipt))?;
            write_document(&path, &bytes)?;
            Ok(path)
        });
        match result {
            Ok(path) => {
                info!(path = %path.display(), "Exported receipt");
                Ok(path)
            }
            Err(e) => {
                error!(receipt_number = %receipt.receipt_number, error = %e, "Export failed");
                Err(e)
            }
        }
    }
}

fn write_document(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).map_err(|e| {
        let _ = std::fs::remove_file(path);
        ExportError::Io(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Branding;
    use chrono::NaiveDate;

    struct FailingRenderer;

    impl DocumentRenderer for FailingRenderer {
        fn extension(&self) -> &str {
            "pdf"
        }

        fn render(&self, _view: &ReceiptView) -> Result<Vec<u8>, ExportError> {
            Err(ExportError::Render("target element not found".into()))
        }
    }

    fn receipt() -> Receipt {
        let mut r = Receipt::new(
            &Branding::default(),
            NaiveDate::from_ymd_opt(2024, 8, 8).unwrap(),
        );
        r.receipt_number = "R-654321".into();
        r
    }

    #[test]
    fn file_name_pattern() {
        assert_eq!(file_name(&receipt(), "pdf"), "receipt_R-654321.pdf");
    }

    #[test]
    fn path_stays_inside_directory() {
        let dir = Path::new("out");
        assert_eq!(
            document_path(dir, &receipt(), "txt").unwrap(),
            dir.join("receipt_R-654321.txt")
        );
        for number in ["x/../../escaped", "a\\b", "..", "R-1/2"] {
            let mut r = receipt();
            r.receipt_number = number.into();
            assert!(matches!(
                document_path(dir, &r, "txt"),
                Err(ExportError::UnsafeName(n)) if n == number
            ));
        }
    }

    #[test]
    fn failure_clears_busy_and_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("export_{}", uuid::Uuid::new_v4()));
        let exporter = Exporter::new(FailingRenderer);
        let err = exporter.export(&receipt(), &dir).unwrap_err();
        assert!(matches!(err, ExportError::Render(_)));
        assert!(!exporter.is_busy());
        assert!(!dir.join("receipt_R-654321.pdf").exists());
    }

    #[test]
    fn second_export_is_refused_while_busy() {
        let exporter = Exporter::new(FailingRenderer);
        let guard = exporter.begin().unwrap();
        assert!(matches!(
            exporter.export(&receipt(), &std::env::temp_dir()),
            Err(ExportError::Busy)
        ));
        drop(guard);
        assert!(!exporter.is_busy());
    }
}

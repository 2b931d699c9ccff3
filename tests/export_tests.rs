use chrono::NaiveDate;
use receipt_book::core::{Branding, Receipt};
use receipt_book::export::{DocumentRenderer, ExportError, Exporter, file_name};
use receipt_book::presentation::{ReceiptView, TextRenderer};
use uuid::Uuid;

struct PdfStub;

impl DocumentRenderer for PdfStub {
    fn extension(&self) -> &str {
        "pdf"
    }

    fn render(&self, view: &ReceiptView) -> Result<Vec<u8>, ExportError> {
        Ok(format!("%PDF {}", view.receipt_number).into_bytes())
    }
}

fn receipt() -> Receipt {
    let mut r = Receipt::new(
        &Branding {
            company_name: "Atlas Services".into(),
            ..Branding::default()
        },
        NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
    );
    r.receipt_number = "R-246810".into();
    r.client_name = "Laila".into();
    r.total_price = Some(2_000.0);
    r.paid_amount = Some(1_250.0);
    r.purpose = "Consulting retainer".into();
    r
}

#[test]
fn exports_named_document() {
    let dir = std::env::temp_dir().join(format!("export_{}", Uuid::new_v4()));
    let exporter = Exporter::new(PdfStub);
    let path = exporter.export(&receipt(), &dir).unwrap();
    assert_eq!(path, dir.join("receipt_R-246810.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF R-246810");
    assert!(!exporter.is_busy());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn text_export_contains_words_and_balance() {
    let dir = std::env::temp_dir().join(format!("export_{}", Uuid::new_v4()));
    let path = Exporter::new(TextRenderer).export(&receipt(), &dir).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        file_name(&receipt(), "txt")
    );
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Atlas Services"));
    assert!(text.contains("ألف ومائتان وخمسون درهم مغربي فقط لا غير"));
    assert!(text.contains("المبلغ الإجمالي: 2,000 dh"));
    assert!(text.contains("المبلغ المتبقي: 750 dh"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn traversing_receipt_number_is_refused() {
    let base = std::env::temp_dir().join(format!("export_{}", Uuid::new_v4()));
    let dir = base.join("out");
    let mut r = receipt();
    r.receipt_number = "x/../../escaped".into();

    let exporter = Exporter::new(TextRenderer);
    let err = exporter.export(&r, &dir).unwrap_err();
    assert!(matches!(err, ExportError::UnsafeName(_)));
    assert!(!exporter.is_busy());
    assert!(!base.join("escaped.txt").exists());
    assert!(!dir.exists());
    let _ = std::fs::remove_dir_all(base);
}

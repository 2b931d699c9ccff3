use std::fmt;

use super::{ReceiptView, format_amount};
use crate::export::{DocumentRenderer, ExportError};

const WIDTH: usize = 72;

/// Lays a receipt out as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn render_string(&self, view: &ReceiptView) -> String {
        TextDocument(view).to_string()
    }
}

struct TextDocument<'a>(&'a ReceiptView);

impl fmt::Display for TextDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let rule = "=".repeat(WIDTH);
        let thin = "-".repeat(WIDTH);

        let company = if view.company_name.is_empty() {
            "اسم الشركة"
        } else {
            view.company_name.as_str()
        };
        writeln!(f, "{rule}")?;
        writeln!(f, "{company}")?;
        writeln!(f, "سند قبض مالي / Official Payment Receipt")?;
        writeln!(f, "الرقم: {}    التاريخ: {}", view.receipt_number, view.receipt_date)?;
        writeln!(f, "{rule}")?;

        writeln!(f, "وصلنا من السيد / السادة : {}", view.client_name)?;
        if let Some(words) = &view.amount_in_words {
            writeln!(f, "مبلغ وقدره : {words}")?;
        }
        writeln!(f, "{thin}")?;

        writeln!(f, "طريقة الدفع: {}", view.method_label)?;
        for (label, value) in &view.method_details {
            writeln!(f, "  {label}: {value}")?;
        }
        writeln!(f, "{thin}")?;

        if let Some(total) = view.total_price {
            writeln!(f, "المبلغ الإجمالي: {}", format_amount(total))?;
        }
        writeln!(
            f,
            "المبلغ الحالي: {}",
            format_amount(view.paid_amount.unwrap_or(0.0))
        )?;
        if let Some(remaining) = view.remaining {
            writeln!(f, "المبلغ المتبقي: {}", format_amount(remaining))?;
        }

        if !view.previous_payments.is_empty() {
            writeln!(f, "{thin}")?;
            writeln!(f, "سجل الدفعات السابقة")?;
            for p in &view.previous_payments {
                writeln!(
                    f,
                    "  {} | {} | {} | {}",
                    p.receipt_number,
                    p.date.format("%Y-%m-%d"),
                    format_amount(p.amount),
                    p.method
                )?;
            }
        }

        writeln!(f, "{thin}")?;
        writeln!(f, "وذلك مقابل:")?;
        for line in textwrap::wrap(&view.purpose, WIDTH - 2) {
            writeln!(f, "  {line}")?;
        }

        writeln!(f, "{rule}")?;
        let signed = if view.has_signature { "[موقع]" } else { "" };
        let stamped = if view.has_stamp { "[مختوم]" } else { "" };
        writeln!(f, "المحاسب / المستلم {signed}    الختم الرسمي {stamped}")
    }
}

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &str {
        "txt"
    }

    fn render(&self, view: &ReceiptView) -> Result<Vec<u8>, ExportError> {
        Ok(self.render_string(view).into_bytes())
    }
}

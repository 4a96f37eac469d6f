use lopdf::Document;
use thiserror::Error;

use crate::RenderedPage;

/// Column width every page is rendered at.
pub const DISPLAY_WIDTH: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    #[error("not a PDF document")]
    NotPdf,
    #[error("cannot parse PDF: {0}")]
    Malformed(String),
    #[error("document has no pages")]
    NoPages,
    #[error("page {page} is outside 1..={total}")]
    PageOutOfRange { page: u32, total: u32 },
    #[error("no document is loaded")]
    NotLoaded,
}

/// A document accepted by a [`PageRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub name: String,
    pub version: Option<String>,
    pub page_count: u32,
    pub byte_len: u64,
}

/// Rendering capability used by the viewer.
pub trait PageRenderer: Send + Sync {
    fn load(&self, name: &str, bytes: &[u8]) -> Result<LoadedDocument, ViewerError>;

    fn render_page(
        &self,
        document: &LoadedDocument,
        page: u32,
        width: usize,
    ) -> Result<RenderedPage, ViewerError>;
}

/// Renders a page card (name, position, size) without rasterising content.
///
/// The page count comes from walking the document's page tree with `lopdf`,
/// so incremental updates and compressed object streams are resolved the way
/// a reader resolves them.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummaryRenderer;

const HEADER: &[u8] = b"%PDF-";
// Readers accept junk before the header within the first kilobyte.
const HEADER_SEARCH_LIMIT: usize = 1024;

fn has_header(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(HEADER_SEARCH_LIMIT)]
        .windows(HEADER.len())
        .any(|candidate| candidate == HEADER)
}

impl PageRenderer for SummaryRenderer {
    fn load(&self, name: &str, bytes: &[u8]) -> Result<LoadedDocument, ViewerError> {
        if !has_header(bytes) {
            return Err(ViewerError::NotPdf);
        }
        let pdf = Document::load_mem(bytes).map_err(|e| ViewerError::Malformed(e.to_string()))?;
        let page_count = u32::try_from(pdf.get_pages().len()).unwrap_or(u32::MAX);
        if page_count == 0 {
            return Err(ViewerError::NoPages);
        }
        Ok(LoadedDocument {
            name: name.to_string(),
            version: (!pdf.version.is_empty()).then(|| pdf.version.clone()),
            page_count,
            byte_len: bytes.len() as u64,
        })
    }

    fn render_page(
        &self,
        document: &LoadedDocument,
        page: u32,
        width: usize,
    ) -> Result<RenderedPage, ViewerError> {
        let total = document.page_count;
        if page == 0 || page > total {
            return Err(ViewerError::PageOutOfRange { page, total });
        }
        let inner = width.saturating_sub(4).max(10);
        let version = document
            .version
            .as_deref()
            .map(|v| format!("PDF {v}"))
            .unwrap_or_else(|| "PDF".to_string());

        let mut lines = Vec::with_capacity(8);
        lines.push(format!("┌{}┐", "─".repeat(inner + 2)));
        lines.push(boxed(&document.name, inner));
        lines.push(boxed("", inner));
        lines.push(boxed(&format!("Page {page} of {total}"), inner));
        lines.push(boxed(&position_bar(page, total, inner), inner));
        lines.push(boxed("", inner));
        lines.push(boxed(
            &format!("{version} · {}", format_size(document.byte_len)),
            inner,
        ));
        lines.push(format!("└{}┘", "─".repeat(inner + 2)));
        Ok(RenderedPage { page, lines })
    }
}

fn boxed(text: &str, inner: usize) -> String {
    let mut content: String = text.chars().take(inner).collect();
    let len = content.chars().count();
    content.extend(std::iter::repeat(' ').take(inner - len));
    format!("│ {content} │")
}

fn position_bar(page: u32, total: u32, inner: usize) -> String {
    let filled = (inner as u64 * u64::from(page) / u64::from(total.max(1))) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(inner - filled))
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KIB {
        format!("{bytes} B")
    } else if bytes_f < KIB * KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{:.1} MiB", bytes_f / (KIB * KIB))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::{dictionary, Document, Object};

    /// A well-formed document with `pages` empty pages.
    pub(crate) fn pdf_with_pages(pages: u32) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                Object::Reference(doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                }))
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => i64::from(pages),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn push_object(out: &mut Vec<u8>, id: u32, body: &[u8]) -> usize {
        let offset = out.len();
        out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
        offset
    }

    fn push_xref_table(out: &mut Vec<u8>, sections: &[(u32, &[usize])], trailer: &str) {
        let start = out.len();
        out.extend_from_slice(b"xref\n");
        for (first, offsets) in sections {
            out.extend_from_slice(format!("{first} {}\n", offsets.len()).as_bytes());
            for offset in *offsets {
                if *offset == 0 {
                    out.extend_from_slice(b"0000000000 65535 f \n");
                } else {
                    out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
                }
            }
        }
        out.extend_from_slice(format!("trailer\n{trailer}\nstartxref\n{start}\n%%EOF\n").as_bytes());
    }

    /// One page whose page object was rewritten by an appended update.
    pub(crate) fn incrementally_updated_single_page() -> Vec<u8> {
        let mut out = b"%PDF-1.4\n".to_vec();
        let catalog = push_object(&mut out, 1, b"<< /Type /Catalog /Pages 2 0 R >>");
        let pages = push_object(&mut out, 2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
        let page = push_object(&mut out, 3, b"<< /Type /Page /Parent 2 0 R >>");
        let first_xref = out.len();
        push_xref_table(
            &mut out,
            &[(0, &[0, catalog, pages, page][..])],
            "<< /Size 4 /Root 1 0 R >>",
        );

        let rewritten = push_object(&mut out, 3, b"<< /Type /Page /Parent 2 0 R /Rotate 90 >>");
        push_xref_table(
            &mut out,
            &[(0, &[0][..]), (3, &[rewritten][..])],
            &format!("<< /Size 4 /Root 1 0 R /Prev {first_xref} >>"),
        );
        out
    }

    /// Two pages whose page tree lives in an object stream, indexed by a
    /// cross-reference stream.
    pub(crate) fn object_stream_two_pages() -> Vec<u8> {
        let members: [&str; 3] = [
            "<< /Type /Pages /Kids [3 0 R 4 0 R] /Count 2 >>",
            "<< /Type /Page /Parent 2 0 R >>",
            "<< /Type /Page /Parent 2 0 R >>",
        ];
        let mut index = String::new();
        let mut body = String::new();
        for (n, member) in members.iter().enumerate() {
            index.push_str(&format!("{} {} ", n + 2, body.len()));
            body.push_str(member);
            body.push(' ');
        }
        let content = format!("{index}{body}");

        let mut out = b"%PDF-1.5\n".to_vec();
        let catalog = push_object(&mut out, 1, b"<< /Type /Catalog /Pages 2 0 R >>");
        let stream = format!(
            "<< /Type /ObjStm /N 3 /First {} /Length {} >>\nstream\n{content}\nendstream",
            index.len(),
            content.len()
        );
        let object_stream = push_object(&mut out, 5, stream.as_bytes());

        let xref_at = out.len();
        // /W [1 2 1]: type, offset or stream number, generation or index.
        let mut entries: Vec<u8> = Vec::new();
        let mut entry = |kind: u8, field: usize, extra: u8| {
            entries.push(kind);
            entries.extend_from_slice(&u16::try_from(field).unwrap().to_be_bytes());
            entries.push(extra);
        };
        entry(0, 0, 255);
        entry(1, catalog, 0);
        entry(2, 5, 0);
        entry(2, 5, 1);
        entry(2, 5, 2);
        entry(1, object_stream, 0);
        entry(1, xref_at, 0);

        let mut xref = format!(
            "<< /Type /XRef /Size 7 /W [1 2 1] /Root 1 0 R /Length {} >>\nstream\n",
            entries.len()
        )
        .into_bytes();
        xref.extend_from_slice(&entries);
        xref.extend_from_slice(b"\nendstream");
        push_object(&mut out, 6, &xref);
        out.extend_from_slice(format!("startxref\n{xref_at}\n%%EOF\n").as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn counts_pages_from_page_tree() {
        let doc = SummaryRenderer.load("two.pdf", &pdf_with_pages(2)).unwrap();
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.version.as_deref(), Some("1.5"));
    }

    #[test]
    fn incremental_update_does_not_add_pages() {
        let doc = SummaryRenderer
            .load("updated.pdf", &incrementally_updated_single_page())
            .unwrap();
        assert_eq!(doc.page_count, 1);
        assert_eq!(doc.version.as_deref(), Some("1.4"));
    }

    #[test]
    fn reads_page_tree_inside_object_stream() {
        let doc = SummaryRenderer
            .load("compressed.pdf", &object_stream_two_pages())
            .unwrap();
        assert_eq!(doc.page_count, 2);
    }

    #[test]
    fn rejects_non_pdf_broken_and_empty_documents() {
        assert_eq!(
            SummaryRenderer.load("notes.txt", b"hello world"),
            Err(ViewerError::NotPdf)
        );
        assert!(matches!(
            SummaryRenderer.load("broken.pdf", b"%PDF-1.4\n%%EOF"),
            Err(ViewerError::Malformed(_))
        ));
        assert_eq!(
            SummaryRenderer.load("empty.pdf", &pdf_with_pages(0)),
            Err(ViewerError::NoPages)
        );
    }

    #[test]
    fn renders_fixed_width_card() {
        let doc = SummaryRenderer.load("two.pdf", &pdf_with_pages(2)).unwrap();
        let page = SummaryRenderer.render_page(&doc, 2, DISPLAY_WIDTH).unwrap();
        assert_eq!(page.page, 2);
        assert!(page.lines.iter().any(|l| l.contains("Page 2 of 2")));
        let widths: Vec<_> = page.lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == DISPLAY_WIDTH));
    }

    #[test]
    fn rejects_pages_out_of_range() {
        let doc = SummaryRenderer.load("two.pdf", &pdf_with_pages(2)).unwrap();
        assert_eq!(
            SummaryRenderer.render_page(&doc, 3, DISPLAY_WIDTH),
            Err(ViewerError::PageOutOfRange { page: 3, total: 2 })
        );
    }
}

use crate::Line;

/// Whether the word-processor reader was compiled in.
pub fn available() -> bool {
    cfg!(feature = "docx")
}

/// Extracts all text lines from a word-processor document: paragraph text
/// in document order first, then table-cell text in row/cell order. The
/// two are deliberately not interleaved; week segmentation downstream
/// relies on this ordering.
#[cfg(feature = "docx")]
#[tracing::instrument(skip(bytes))]
pub fn extract_lines(bytes: &[u8]) -> anyhow::Result<Vec<Line>> {
    use anyhow::anyhow;
    use docx_rs::{
        DocumentChild, Paragraph, ParagraphChild, Run, RunChild, TableCellContent, TableChild,
        TableRowChild,
    };
    use tracing::debug;

    fn run_text(run: &Run, out: &mut String) {
        for child in &run.children {
            match child {
                RunChild::Text(t) => out.push_str(&t.text),
                RunChild::Tab(_) => out.push('\t'),
                RunChild::Break(_) => out.push('\n'),
                _ => {}
            }
        }
    }

    fn paragraph_text(paragraph: &Paragraph) -> String {
        let mut text = String::new();
        for child in &paragraph.children {
            match child {
                ParagraphChild::Run(run) => run_text(run, &mut text),
                ParagraphChild::Hyperlink(link) => {
                    for child in &link.children {
                        if let ParagraphChild::Run(run) = child {
                            run_text(run, &mut text);
                        }
                    }
                }
                _ => {}
            }
        }
        text
    }

    fn push_lines(lines: &mut Vec<Line>, position: &str, text: &str) {
        for part in text.split('\n') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let line = Line::new(position, trimmed);
            debug!("collect line: {:?}", line);
            lines.push(line);
        }
    }

    let doc = docx_rs::read_docx(bytes).map_err(|err| anyhow!("failed to read document: {}", err))?;

    let mut lines = Vec::new();
    for (i, child) in doc.document.children.iter().enumerate() {
        if let DocumentChild::Paragraph(paragraph) = child {
            push_lines(&mut lines, &format!("p{}", i), &paragraph_text(paragraph));
        }
    }
    let tables = doc.document.children.iter().filter_map(|child| match child {
        DocumentChild::Table(table) => Some(table),
        _ => None,
    });
    for (t, table) in tables.enumerate() {
        for (r, row) in table.rows.iter().enumerate() {
            let TableChild::TableRow(row) = row;
            for (c, cell) in row.cells.iter().enumerate() {
                let TableRowChild::TableCell(cell) = cell;
                let mut text = String::new();
                for content in &cell.children {
                    if let TableCellContent::Paragraph(paragraph) = content {
                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(&paragraph_text(paragraph));
                    }
                }
                push_lines(&mut lines, &format!("t{}({},{})", t, r, c), &text);
            }
        }
    }
    Ok(lines)
}

#[cfg(not(feature = "docx"))]
pub fn extract_lines(_bytes: &[u8]) -> anyhow::Result<Vec<Line>> {
    Err(anyhow::anyhow!(
        "word-processor reader not available: built without the 'docx' feature"
    ))
}

//! Page filtering for the exported invoice PDF.
//!
//! The exported PDF contains every sheet of the document; only a fixed set of
//! pages make up the invoice. Copying pages is delegated to a [`PageCopier`],
//! by default [`QpdfPageCopier`], which runs the `qpdf` command-line tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::{info, warn};

/// Zero-based indices of the invoice pages in the exported document.
pub const INVOICE_PAGES: [usize; 2] = [12, 13];

/// Errors from filtering pages.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Raw invoice PDF does not exist at: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("None of the requested pages exist in '{}' ({count} pages)", path.display())]
    NoPages { path: PathBuf, count: usize },

    #[error("qpdf not found at: {0}")]
    NotFound(String),

    #[error("Failed to spawn qpdf: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("qpdf failed (exit status {status}): {stderr}")]
    ToolFailed { status: String, stderr: String },

    #[error("Unexpected page count output: {0:?}")]
    BadPageCount(String),
}

/// Counts and copies PDF pages.
pub trait PageCopier {
    /// Number of pages in `src`.
    fn page_count(&self, src: &Path) -> Result<usize, PageError>;

    /// Write the zero-based `pages` of `src`, in order, to a new document at `dst`.
    fn copy_pages(&self, src: &Path, dst: &Path, pages: &[usize]) -> Result<(), PageError>;
}

/// Which requested pages made it into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCopyReport {
    /// Pages in the source document
    pub page_count: usize,
    /// Requested pages that were copied (zero-based)
    pub copied: Vec<usize>,
    /// Requested pages past the end of the document (zero-based)
    pub missing: Vec<usize>,
}

/// Copy the requested pages of `src` into `dst`, skipping pages the source
/// does not have. Fails when none of the pages exist.
pub fn filter_pages<C: PageCopier + ?Sized>(
    copier: &C,
    src: &Path,
    dst: &Path,
    pages: &[usize],
) -> Result<PageCopyReport, PageError> {
    if !src.exists() {
        return Err(PageError::MissingSource(src.to_path_buf()));
    }

    let page_count = copier.page_count(src)?;
    info!("Loaded PDF with {page_count} pages");

    let (copied, missing): (Vec<usize>, Vec<usize>) =
        pages.iter().partition(|&&page| page < page_count);
    for page in &missing {
        warn!("Page {} does not exist in the PDF", page + 1);
    }

    if copied.is_empty() {
        return Err(PageError::NoPages {
            path: src.to_path_buf(),
            count: page_count,
        });
    }

    copier.copy_pages(src, dst, &copied)?;
    info!("Filtered invoice saved to {}", dst.display());

    Ok(PageCopyReport {
        page_count,
        copied,
        missing,
    })
}

/// Configuration for the `qpdf` page copier.
#[derive(Debug, Clone)]
pub struct QpdfConfig {
    /// Path to the `qpdf` executable. Defaults to "qpdf" (searched in PATH).
    pub qpdf_path: PathBuf,
}

impl Default for QpdfConfig {
    fn default() -> Self {
        Self {
            qpdf_path: PathBuf::from("qpdf"),
        }
    }
}

/// Copies pages by running `qpdf`.
#[derive(Debug, Clone, Default)]
pub struct QpdfPageCopier {
    config: QpdfConfig,
}

impl QpdfPageCopier {
    pub fn new(config: QpdfConfig) -> Self {
        Self { config }
    }

    fn run(&self, mut cmd: Command) -> Result<Output, PageError> {
        let output = cmd.stdin(Stdio::null()).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PageError::NotFound(self.config.qpdf_path.display().to_string())
            } else {
                PageError::SpawnFailed(e)
            }
        })?;

        // Exit status 3 means success with warnings.
        match output.status.code() {
            Some(0) | Some(3) => Ok(output),
            code => Err(PageError::ToolFailed {
                status: code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

impl PageCopier for QpdfPageCopier {
    fn page_count(&self, src: &Path) -> Result<usize, PageError> {
        let mut cmd = Command::new(&self.config.qpdf_path);
        cmd.arg("--show-npages").arg(src);
        let output = self.run(cmd)?;
        let text = String::from_utf8_lossy(&output.stdout);
        text.trim()
            .parse()
            .map_err(|_| PageError::BadPageCount(text.trim().to_string()))
    }

    fn copy_pages(&self, src: &Path, dst: &Path, pages: &[usize]) -> Result<(), PageError> {
        let mut cmd = Command::new(&self.config.qpdf_path);
        cmd.arg("--empty")
            .arg("--pages")
            .arg(src)
            .arg(qpdf_page_list(pages))
            .arg("--")
            .arg(dst);
        self.run(cmd)?;
        Ok(())
    }
}

/// qpdf numbers pages from 1.
fn qpdf_page_list(pages: &[usize]) -> String {
    pages
        .iter()
        .map(|p| (p + 1).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeCopier {
        pages: usize,
        copied: RefCell<Vec<(PathBuf, Vec<usize>)>>,
    }

    impl FakeCopier {
        fn with_pages(pages: usize) -> Self {
            Self {
                pages,
                copied: RefCell::new(Vec::new()),
            }
        }
    }

    impl PageCopier for FakeCopier {
        fn page_count(&self, _src: &Path) -> Result<usize, PageError> {
            Ok(self.pages)
        }

        fn copy_pages(&self, _src: &Path, dst: &Path, pages: &[usize]) -> Result<(), PageError> {
            self.copied
                .borrow_mut()
                .push((dst.to_path_buf(), pages.to_vec()));
            Ok(())
        }
    }

    fn source() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[test]
    fn test_copies_invoice_pages() {
        let src = source();
        let copier = FakeCopier::with_pages(20);
        let report =
            filter_pages(&copier, src.path(), Path::new("/tmp/out.pdf"), &INVOICE_PAGES).unwrap();

        assert_eq!(report.copied, vec![12, 13]);
        assert!(report.missing.is_empty());
        assert_eq!(
            copier.copied.borrow().as_slice(),
            &[(PathBuf::from("/tmp/out.pdf"), vec![12, 13])]
        );
    }

    #[test]
    fn test_skips_pages_past_the_end() {
        let src = source();
        let copier = FakeCopier::with_pages(13);
        let report =
            filter_pages(&copier, src.path(), Path::new("/tmp/out.pdf"), &INVOICE_PAGES).unwrap();

        assert_eq!(report.page_count, 13);
        assert_eq!(report.copied, vec![12]);
        assert_eq!(report.missing, vec![13]);
    }

    #[test]
    fn test_no_surviving_pages_is_an_error() {
        let src = source();
        let copier = FakeCopier::with_pages(2);
        let err = filter_pages(&copier, src.path(), Path::new("/tmp/out.pdf"), &INVOICE_PAGES)
            .unwrap_err();

        assert!(matches!(err, PageError::NoPages { count: 2, .. }));
        assert!(copier.copied.borrow().is_empty());
    }

    #[test]
    fn test_missing_source() {
        let copier = FakeCopier::with_pages(20);
        let err = filter_pages(
            &copier,
            Path::new("/nonexistent/raw.pdf"),
            Path::new("/tmp/out.pdf"),
            &INVOICE_PAGES,
        )
        .unwrap_err();

        assert!(matches!(err, PageError::MissingSource(_)));
    }

    #[test]
    fn test_qpdf_page_list_is_one_based() {
        assert_eq!(qpdf_page_list(&[12, 13]), "13,14");
        assert_eq!(qpdf_page_list(&[0]), "1");
    }
}

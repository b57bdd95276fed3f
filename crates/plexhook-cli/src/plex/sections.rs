//! Library section catalog.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::{AuthToken, PlexClient, TOKEN_QUERY_PARAM};
use crate::error::{CatalogError, XmlError};

/// Kind of media held by a library section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Movie library.
    Movie,
    /// TV show library.
    Show,
    /// Any other library type (music, photos, ...).
    Other,
}

impl SectionKind {
    /// Classify a Plex `type` attribute.
    #[must_use]
    pub fn from_plex_type(value: &str) -> Self {
        match value {
            "movie" => Self::Movie,
            "show" => Self::Show,
            _ => Self::Other,
        }
    }
}

/// A library section on the media server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    /// Section identifier (the `key` attribute).
    pub id: String,
    /// Media kind of the section.
    pub kind: SectionKind,
}

impl LibrarySection {
    /// Section with the given identifier and kind.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

impl PlexClient<'_> {
    /// List the server's movie and show sections in document order.
    pub(crate) async fn fetch_sections(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<LibrarySection>, CatalogError> {
        let url = self
            .endpoint(&["library", "sections"])
            .ok_or_else(|| CatalogError::Endpoint {
                url: self.server.base_url.to_string(),
            })?;
        let shown = url.to_string();
        let response = self
            .http
            .get(url)
            .query(&[(TOKEN_QUERY_PARAM, token.as_str())])
            .send()
            .await
            .map_err(|err| CatalogError::Transport {
                url: shown.clone(),
                source: err.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: shown,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|err| CatalogError::Transport {
            url: shown.clone(),
            source: err.without_url(),
        })?;
        let sections = parse_sections(&body).map_err(|source| CatalogError::Malformed {
            url: shown,
            source,
        })?;
        debug!(count = sections.len(), "fetched library sections");
        Ok(sections)
    }
}

/// Collect movie and show `Directory` children of the listing root.
pub(crate) fn parse_sections(xml: &str) -> Result<Vec<LibrarySection>, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut sections = Vec::new();
    let mut saw_root = false;
    // Number of currently open elements.
    let mut depth = 0_usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                saw_root = true;
                if depth == 1 && e.name().as_ref() == b"Directory" {
                    push_section(&e, &mut sections)?;
                }
                depth += 1;
            }
            Event::Empty(e) => {
                saw_root = true;
                if depth == 1 && e.name().as_ref() == b"Directory" {
                    push_section(&e, &mut sections)?;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if saw_root {
        Ok(sections)
    } else {
        Err(XmlError::Empty)
    }
}

fn push_section(
    element: &BytesStart<'_>,
    sections: &mut Vec<LibrarySection>,
) -> Result<(), XmlError> {
    let mut id = None;
    let mut kind = SectionKind::Other;
    for attr in element.attributes().flatten() {
        match attr.key.as_ref() {
            b"key" => id = Some(attr.unescape_value()?.trim().to_string()),
            b"type" => kind = SectionKind::from_plex_type(attr.unescape_value()?.trim()),
            _ => {}
        }
    }
    match id {
        Some(id) if !id.is_empty() && kind != SectionKind::Other => {
            sections.push(LibrarySection { id, kind });
        }
        _ => debug!(?kind, "ignoring library section"),
    }
    Ok(())
}

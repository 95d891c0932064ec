//! XML profile stores (`#Default.xml`, `#Default.xmlbackup`)

use std::io::BufReader;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use super::IdentitySource;
use super::schema::{
    ElementLayout, HIERARCHICAL_ELEMENTS, ID_FIELDS, INVALID_FIELDS, NAME_FIELDS, is_truthy,
    latest_update, owner_identity, parse_millis, pick_field, timestamp_fields,
};
use crate::error::StoreError;
use crate::models::{Identity, StoreFormat};
use crate::utils::open_bounded;

/// Streams owners out of a jEveAssets XML profile
#[derive(Debug, Clone)]
pub struct HierarchicalSource {
    path: PathBuf,
    max_bytes: u64,
}

impl HierarchicalSource {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self { path: path.into(), max_bytes }
    }
}

impl IdentitySource for HierarchicalSource {
    fn format(&self) -> StoreFormat {
        StoreFormat::Hierarchical
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> Result<Vec<Identity>, StoreError> {
        let file = open_bounded(&self.path, self.max_bytes)?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut matches: Vec<LayoutMatch> =
            HIERARCHICAL_ELEMENTS.iter().map(|layout| LayoutMatch::new(*layout)).collect();
        let mut open_elements: usize = 0;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    open_elements += 1;
                    self.visit(e, Some(open_elements), &mut matches)?;
                }
                Ok(Event::Empty(ref e)) => self.visit(e, None, &mut matches)?,
                Ok(Event::End(_)) => {
                    for m in matches.iter_mut() {
                        if m.container_depth == Some(open_elements) {
                            m.container_depth = None;
                        }
                    }
                    open_elements = open_elements.saturating_sub(1);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(StoreError::parse(
                        &self.path,
                        format!("at byte {}: {}", reader.buffer_position(), e),
                    ));
                }
                _ => {}
            }
            buf.clear();
        }

        if open_elements != 0 {
            return Err(StoreError::parse(
                &self.path,
                format!("document ends with {} unterminated element(s)", open_elements),
            ));
        }

        match matches.into_iter().find(|m| m.seen) {
            Some(found) => {
                debug!(
                    path = %self.path.display(),
                    record = found.layout.record,
                    count = found.identities.len(),
                    "extracted owners"
                );
                Ok(found.identities)
            }
            None => Err(StoreError::SchemaMismatch {
                path: self.path.clone(),
                tried: HIERARCHICAL_ELEMENTS
                    .iter()
                    .map(|l| format!("{}/{}", l.container, l.record))
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

impl HierarchicalSource {
    /// Record tags only count inside their layout's container.
    ///
    /// `opened_at` is the element depth for a start tag, `None` for an empty one.
    fn visit(
        &self,
        element: &BytesStart<'_>,
        opened_at: Option<usize>,
        matches: &mut [LayoutMatch],
    ) -> Result<(), StoreError> {
        let tag = element.name();
        let tag = tag.as_ref();

        for m in matches.iter_mut() {
            if tag.eq_ignore_ascii_case(m.layout.container.as_bytes()) {
                m.seen = true;
                if m.container_depth.is_none() {
                    m.container_depth = opened_at;
                }
            } else if m.container_depth.is_some()
                && tag.eq_ignore_ascii_case(m.layout.record.as_bytes())
                && let Some(identity) = self.read_owner(element)?
            {
                m.identities.push(identity);
            }
        }
        Ok(())
    }

    fn read_owner(&self, element: &BytesStart<'_>) -> Result<Option<Identity>, StoreError> {
        let mut keys = Vec::new();
        let mut values = Vec::new();

        for attr in element.attributes() {
            let attr = attr.map_err(|e| StoreError::parse(&self.path, e))?;
            let value = attr.unescape_value().map_err(|e| StoreError::parse(&self.path, e))?;
            keys.push(String::from_utf8_lossy(attr.key.as_ref()).into_owned());
            values.push(value.into_owned());
        }

        let value_of = |field: Option<&str>| -> Option<String> {
            let field = field?;
            keys.iter().position(|k| k == field).map(|idx| values[idx].clone())
        };

        if value_of(pick_field(&keys, INVALID_FIELDS)).is_some_and(|v| is_truthy(&v)) {
            return Ok(None);
        }

        let stamps: Vec<Option<i64>> = timestamp_fields(&keys)
            .iter()
            .map(|field| value_of(Some(field)).as_deref().and_then(parse_millis))
            .collect();

        let identity = owner_identity(
            value_of(pick_field(&keys, ID_FIELDS)),
            value_of(pick_field(&keys, NAME_FIELDS)),
            latest_update(stamps),
        );
        if let Some(identity) = &identity {
            debug!(
                id = %identity.id,
                name = %identity.name,
                last_update = ?identity.last_update,
                "owner element"
            );
        }
        Ok(identity)
    }
}

/// Progress of one candidate layout while streaming the document
struct LayoutMatch {
    layout: ElementLayout,
    seen: bool,
    /// Depth of the currently open container element
    container_depth: Option<usize>,
    identities: Vec<Identity>,
}

impl LayoutMatch {
    fn new(layout: ElementLayout) -> Self {
        Self { layout, seen: false, container_depth: None, identities: Vec::new() }
    }
}

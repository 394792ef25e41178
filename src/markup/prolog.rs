//! XML prolog handling
//!
//! html5ever turns `<?xml ...?>` into a bogus comment and keeps no trace of
//! processing instructions, so everything before the root element is split
//! off with quick-xml and replayed verbatim on output.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use crate::cleaner::errors::{CleanError, Result};

/// Declaration, DOCTYPE, comments and PIs ahead of the root element
#[derive(Clone, Debug, Default)]
pub struct Prolog {
    events: Vec<Event<'static>>,
    root_name: Option<String>,
}

impl Prolog {
    /// Split `markup` into its prolog and the remaining content
    pub fn split(markup: &str) -> (Prolog, &str) {
        let mut reader = Reader::from_str(markup);
        let mut prolog = Prolog::default();
        let mut body_start;

        loop {
            body_start = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    prolog.root_name = Some(name);
                    break;
                }
                Ok(Event::Eof) => {
                    body_start = markup.len();
                    break;
                }
                Ok(Event::Text(text)) if text.iter().all(u8::is_ascii_whitespace) => {
                    prolog.events.push(Event::Text(text.into_owned()));
                }
                Ok(event @ (Event::Decl(_) | Event::DocType(_))) => {
                    prolog.events.push(event.into_owned());
                }
                Ok(event @ (Event::PI(_) | Event::Comment(_))) => {
                    prolog.events.push(event.into_owned());
                }
                _ => break,
            }
        }

        (prolog, &markup[body_start.min(markup.len())..])
    }

    pub fn has_declaration(&self) -> bool {
        self.events.iter().any(|e| matches!(e, Event::Decl(_)))
    }

    /// Local name of the first element, if the scan reached one
    pub fn root_name(&self) -> Option<&str> {
        self.root_name.as_deref()
    }

    /// Standalone SVG/XML document rather than an HTML page or fragment
    pub fn is_xml_document(&self) -> bool {
        self.has_declaration() || self.root_name() == Some("svg")
    }

    pub fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        for event in &self.events {
            writer
                .write_event(event.clone())
                .map_err(|e| CleanError::Write(e.to_string()))?;
        }
        Ok(())
    }
}

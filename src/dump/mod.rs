//! BSON dump streams
//!
//! A dump stream is a plain concatenation of BSON documents, each starting
//! with its own little-endian `i32` length, as written by `mongodump`.
//! [`DumpReader`] yields the documents one at a time and [`convert_dump`]
//! pipes them through a [`Marshaller`] into a [`DocumentWriter`].

use std::io::{self, Read, Write};

use bson::Document;
use tracing::{debug, info};

use crate::error::{InputError, MejsonError, Result};
use crate::marshal::Marshaller;
use crate::writer::DocumentWriter;

/// Smallest valid document: length prefix plus the trailing NUL
const MIN_DOCUMENT_SIZE: i32 = 5;

/// Largest document the server will store
pub const MAX_DOCUMENT_SIZE: i32 = 16 * 1024 * 1024;

/// Iterator over the documents of a dump stream
pub struct DumpReader<R: Read> {
    reader: R,
    /// Index of the next document
    index: usize,
    /// Set after the first error or end of stream
    done: bool,
}

impl<R: Read> DumpReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            index: 0,
            done: false,
        }
    }

    /// Number of documents read so far
    pub fn documents_read(&self) -> usize {
        self.index
    }

    /// Read the next document, or `None` at a clean end of stream
    pub fn read_document(&mut self) -> Result<Option<Document>> {
        let mut len_buf = [0u8; 4];
        let mut filled = 0;
        while filled < len_buf.len() {
            match self.reader.read(&mut len_buf[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => return Err(InputError::Truncated { index: self.index }.into()),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let length = i32::from_le_bytes(len_buf);
        if !(MIN_DOCUMENT_SIZE..=MAX_DOCUMENT_SIZE).contains(&length) {
            return Err(InputError::InvalidLength {
                index: self.index,
                length,
            }
            .into());
        }

        let index = self.index;
        let mut buf = vec![0u8; length as usize];
        buf[..4].copy_from_slice(&len_buf);
        self.reader.read_exact(&mut buf[4..]).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                MejsonError::from(InputError::Truncated { index })
            } else {
                MejsonError::from(e)
            }
        })?;

        let doc = Document::from_reader(&mut buf.as_slice()).map_err(|e| InputError::Bson {
            index,
            message: e.to_string(),
        })?;
        self.index += 1;
        Ok(Some(doc))
    }
}

impl<R: Read> Iterator for DumpReader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_document() {
            Ok(Some(doc)) => Some(Ok(doc)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Convert every document of a dump stream and write it out
///
/// # Returns
/// * `Result<usize>` - Number of documents written
pub fn convert_dump<R: Read, W: Write>(
    reader: R,
    writer: &mut DocumentWriter<W>,
    marshaller: &Marshaller,
) -> Result<usize> {
    let mut converted = 0;
    for doc in DumpReader::new(reader) {
        let doc = doc?;
        let value = marshaller.marshal_document(&doc)?;
        writer.write(&value)?;
        converted += 1;
        if converted % 10_000 == 0 {
            debug!("Converted {} documents", converted);
        }
    }
    info!("Converted {} documents", converted);
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use bson::doc;

    fn encode(docs: &[Document]) -> Vec<u8> {
        let mut out = Vec::new();
        for doc in docs {
            doc.to_writer(&mut out).unwrap();
        }
        out
    }

    #[test]
    fn test_reads_all_documents() {
        let docs = vec![doc! { "a": 1 }, doc! { "b": "two" }, doc! {}];
        let bytes = encode(&docs);

        let read: Vec<Document> = DumpReader::new(bytes.as_slice())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(read, docs);
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = DumpReader::new(&[][..]);
        assert!(reader.next().is_none());
        assert_eq!(reader.documents_read(), 0);
    }

    #[test]
    fn test_truncated_document() {
        let mut bytes = encode(&[doc! { "a": 1 }, doc! { "b": 2 }]);
        bytes.truncate(bytes.len() - 3);

        let mut reader = DumpReader::new(bytes.as_slice());
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            MejsonError::Input(InputError::Truncated { index: 1 })
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_truncated_length_prefix() {
        let mut reader = DumpReader::new(&[0x10u8, 0x00][..]);
        assert!(matches!(
            reader.next().unwrap().unwrap_err(),
            MejsonError::Input(InputError::Truncated { index: 0 })
        ));
    }

    #[test]
    fn test_invalid_length() {
        let bytes = [0x02u8, 0x00, 0x00, 0x00, 0x00];
        let err = DumpReader::new(&bytes[..]).next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            MejsonError::Input(InputError::InvalidLength { index: 0, length: 2 })
        ));
    }

    #[test]
    fn test_corrupt_document() {
        // Length 6, then an element type byte with no name terminator
        let bytes = [0x06u8, 0x00, 0x00, 0x00, 0x10, 0x61];
        let err = DumpReader::new(&bytes[..]).next().unwrap().unwrap_err();
        assert!(matches!(err, MejsonError::Input(InputError::Bson { index: 0, .. })));
    }

    #[test]
    fn test_convert_dump() {
        let oid = bson::oid::ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let bytes = encode(&[doc! { "_id": oid }, doc! { "n": 3 }]);
        let mut writer = DocumentWriter::new(Vec::new(), OutputFormat::Jsonl, 2, false);

        let count = convert_dump(bytes.as_slice(), &mut writer, &Marshaller::new()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(writer.written(), 2);
    }
}

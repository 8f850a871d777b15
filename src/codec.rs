use crate::{node::Children, BucketNode, CachePolicy, Container, Error, Kind, Timestamp};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::DateTime;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

const MAGIC: &[u8; 4] = b"BKTR";
const FORMAT_VERSION: u8 = 1;

// NOTE: Only caps the preallocation, longer lists still decode
const MAX_PREALLOC: usize = 4_096;

fn write_str<W: Write>(writer: &mut W, s: &str) -> crate::Result<()> {
    let len = u32::try_from(s.len()).map_err(|_| Error::Decode("string too long"))?;
    writer.write_u32::<BigEndian>(len)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

fn read_str<R: Read>(reader: &mut R) -> crate::Result<String> {
    let len = reader.read_u32::<BigEndian>()?;

    // NOTE: Allocation is bounded by the bytes actually present, not by the stored length
    let mut buf = vec![];
    reader.by_ref().take(u64::from(len)).read_to_end(&mut buf)?;

    if buf.len() != len as usize {
        return Err(Error::Decode("string is truncated"));
    }

    String::from_utf8(buf).map_err(|_| Error::Decode("string is not utf-8"))
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> crate::Result<()> {
    writer.write_u64::<BigEndian>(len as u64)?;
    Ok(())
}

fn read_len<R: Read>(reader: &mut R) -> crate::Result<usize> {
    usize::try_from(reader.read_u64::<BigEndian>()?).map_err(|_| Error::Decode("length overflow"))
}

fn encode_node<W: Write>(writer: &mut W, node: &BucketNode) -> crate::Result<()> {
    writer.write_u8(node.kind().tag())?;

    if node.kind() != Kind::Root {
        writer.write_i64::<BigEndian>(node.date().and_utc().timestamp())?;
    }

    match node.children() {
        Children::Buckets(buckets) => {
            write_len(writer, buckets.len())?;
            for bucket in buckets {
                encode_node(writer, bucket)?;
            }
        }
        Children::Readings(readings) => {
            write_len(writer, readings.len())?;
            for value in readings {
                writer.write_f64::<BigEndian>(*value)?;
            }
        }
    }

    Ok(())
}

fn decode_node<R: Read>(reader: &mut R, expected: Kind) -> crate::Result<BucketNode> {
    let kind = Kind::from_tag(reader.read_u8()?).ok_or(Error::Decode("invalid bucket kind"))?;
    if kind != expected {
        return Err(Error::Decode("unexpected bucket kind"));
    }

    let date: Timestamp = if kind == Kind::Root {
        BucketNode::root().date()
    } else {
        let secs = reader.read_i64::<BigEndian>()?;
        DateTime::from_timestamp(secs, 0)
            .ok_or(Error::Decode("bucket date out of range"))?
            .naive_utc()
    };

    let len = read_len(reader)?;

    let children = match kind.child() {
        Some(child_kind) => {
            let mut buckets = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                buckets.push(decode_node(reader, child_kind)?);
            }
            Children::Buckets(buckets)
        }
        None => {
            let mut readings = Vec::with_capacity(len.min(MAX_PREALLOC));
            for _ in 0..len {
                readings.push(reader.read_f64::<BigEndian>()?);
            }
            Children::Readings(readings)
        }
    };

    Ok(BucketNode::from_parts(kind, date, children))
}

impl Container {
    /// Serializes all fields and their bucket trees.
    ///
    /// Memoized statistics are not stored, they are recomputed after loading.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn save<W: Write>(&self, writer: &mut W) -> crate::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u8(FORMAT_VERSION)?;

        write_str(writer, &self.sensor)?;
        writer.write_u8(match self.cache_policy {
            CachePolicy::Freeze => 0,
            CachePolicy::InvalidateOnInsert => 1,
        })?;

        let fields = self.fields();
        write_len(writer, fields.len())?;

        for name in fields {
            write_str(writer, name)?;
            if let Some(root) = self.field(name) {
                encode_node(writer, root)?;
            }
        }

        log::debug!("saved {} field(s)", self.len());

        Ok(())
    }

    /// Deserializes a container written by [`Container::save`].
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred, or the data is not a valid container.
    pub fn load<R: Read>(reader: &mut R) -> crate::Result<Self> {
        let mut magic = [0; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(Error::Decode("invalid magic"));
        }

        if reader.read_u8()? != FORMAT_VERSION {
            return Err(Error::Decode("unsupported format version"));
        }

        let sensor = read_str(reader)?;
        let cache_policy = match reader.read_u8()? {
            0 => CachePolicy::Freeze,
            1 => CachePolicy::InvalidateOnInsert,
            _ => return Err(Error::Decode("invalid cache policy")),
        };

        let mut container = Self::builder()
            .sensor(sensor)
            .cache_policy(cache_policy)
            .build();

        let field_count = read_len(reader)?;

        for _ in 0..field_count {
            let name = read_str(reader)?;
            let root = decode_node(reader, Kind::Root)?;
            container.fields.insert(name, root);
        }

        log::debug!("loaded {} field(s)", container.len());

        Ok(container)
    }

    /// Saves the container to a file, replacing it.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Loads a container from a file written by [`Container::save_to_path`].
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred, or the file is not a valid container.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::load(&mut reader)
    }
}

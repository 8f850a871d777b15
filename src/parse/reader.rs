use super::{LineParser, ParserConfig};
use crate::Container;
use std::{fs::File, io::Read, path::Path};

/// Reads a delimited text file into a [`Container`].
pub struct FileReader {
    config: ParserConfig,
}

impl FileReader {
    /// Creates a reader with the given parser settings.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Reads all records from `reader`; the first record is the header.
    ///
    /// Returns the number of data records.
    ///
    /// # Errors
    ///
    /// Returns error if the input cannot be read, or a record has no valid timestamp.
    pub fn read<R: Read>(&self, reader: R, container: &mut Container) -> crate::Result<usize> {
        let mut records = csv::ReaderBuilder::new()
            .delimiter(self.config.separator)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        let mut parser = LineParser::new(container, self.config.clone());

        let Some(header) = records.next() else {
            log::warn!("input is empty");
            return Ok(0);
        };
        parser.parse_header(&header?.iter().collect::<Vec<_>>())?;

        let mut count = 0;

        for record in records {
            let record = record?;
            let fields = record.iter().collect::<Vec<_>>();

            // NOTE: Skip blank lines
            if fields.iter().all(|x| x.trim().is_empty()) {
                continue;
            }

            parser.parse_record(&fields)?;
            count += 1;
        }

        log::debug!("read {count} record(s)");

        Ok(count)
    }

    /// Reads a file, see [`FileReader::read`].
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, or a record has no valid timestamp.
    pub fn read_path<P: AsRef<Path>>(
        &self,
        path: P,
        container: &mut Container,
    ) -> crate::Result<usize> {
        let path = path.as_ref();
        log::debug!("reading {}", path.display());
        self.read(File::open(path)?, container)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Mode, Resolution, Timestamp};
    use chrono::NaiveDate;
    use std::io::Write;
    use test_log::test;

    fn ts(d: u32, h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2017, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    const VITALS: &str = "\
Timestamp;hr;rr
2017-01-05 22:12;70;14
2017-01-05 22:12;72;15

2017-01-05 22:13;80;
2017-01-05 23:01;60;12
2017-01-06 00:00;50;11
";

    #[test]
    fn read_vitals() {
        let mut container = Container::new();
        let reader = FileReader::new(ParserConfig::new().separator(b';'));

        let count = reader.read(VITALS.as_bytes(), &mut container).unwrap();
        assert_eq!(5, count);
        assert_eq!(vec!["hr", "rr"], container.fields());

        let points = container
            .query("hr", ts(5, 22, 12), ts(5, 22, 13), Resolution::Minute, Mode::Mean)
            .unwrap();
        assert_eq!(
            vec![Some(71.0), Some(80.0)],
            points.iter().map(crate::Point::value).collect::<Vec<_>>()
        );

        let points = container
            .query("hr", ts(5, 0, 0), ts(6, 23, 0), Resolution::Day, Mode::Mean)
            .unwrap();
        // day 5 = (hour 22 + hour 23) / 2 = ((71 + 80) / 2 + 60) / 2
        assert_eq!(
            vec![Some(67.75), Some(50.0)],
            points.iter().map(crate::Point::value).collect::<Vec<_>>()
        );
    }

    #[test]
    fn read_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitals.csv");

        let mut file = File::create(&path).unwrap();
        file.write_all(VITALS.replace(';', ",").as_bytes()).unwrap();
        drop(file);

        let mut container = Container::new();
        let count = FileReader::new(ParserConfig::new().column("rr"))
            .read_path(&path, &mut container)
            .unwrap();

        assert_eq!(5, count);
        assert_eq!(vec!["rr"], container.fields());
    }

    #[test]
    fn read_empty() {
        let mut container = Container::new();
        let count = FileReader::new(ParserConfig::new())
            .read("".as_bytes(), &mut container)
            .unwrap();

        assert_eq!(0, count);
        assert!(container.is_empty());
    }
}

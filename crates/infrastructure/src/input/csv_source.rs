use async_trait::async_trait;
use ferrous_replay_application::ports::{IngestedQueries, QueryRecordSource};
use ferrous_replay_domain::{
    parse_offset, DomainError, QueryDescriptor, RecordType, UnsupportedTypePolicy,
};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Reads `offset,domain,type,transport,do[,...]` records without a header.
pub struct CsvQuerySource {
    path: PathBuf,
    unsupported_types: UnsupportedTypePolicy,
}

impl CsvQuerySource {
    pub fn new(path: impl Into<PathBuf>, unsupported_types: UnsupportedTypePolicy) -> Self {
        Self {
            path: path.into(),
            unsupported_types,
        }
    }
}

#[async_trait]
impl QueryRecordSource for CsvQuerySource {
    async fn load(&self) -> Result<IngestedQueries, DomainError> {
        let path = self.path.clone();
        let policy = self.unsupported_types.clone();

        tokio::task::spawn_blocking(move || {
            let file = File::open(&path).map_err(|e| {
                DomainError::InputUnreadable(format!("{}: {}", path.display(), e))
            })?;
            Ok(parse_records(file, &policy))
        })
        .await
        .map_err(|e| DomainError::InputUnreadable(format!("ingestion task failed: {}", e)))?
    }
}

/// Decodes every record from `reader`.
///
/// Bad records are logged and counted as skipped; they never abort the load.
pub fn parse_records<R: Read>(reader: R, policy: &UnsupportedTypePolicy) -> IngestedQueries {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut ingested = IngestedQueries::default();

    for (index, record) in csv_reader.records().enumerate() {
        if let Err(e) = &record {
            if e.is_io_error() {
                warn!(error = %e, "Input read failed, stopping ingestion");
                break;
            }
        }
        ingested.records_read += 1;
        let line = record
            .as_ref()
            .ok()
            .and_then(|r| r.position())
            .map_or(index as u64 + 1, |p| p.line());

        let decoded = record
            .map_err(|e| DomainError::MalformedRecord(e.to_string()))
            .and_then(|r| decode_record(&r, policy));

        match decoded {
            Ok(Some(descriptor)) => ingested.descriptors.push(descriptor),
            Ok(None) => ingested.records_skipped += 1,
            Err(e) => {
                warn!(line, error = %e, "Skipping input record");
                ingested.records_skipped += 1;
            }
        }
    }

    debug!(
        read = ingested.records_read,
        skipped = ingested.records_skipped,
        "Input decoded"
    );
    ingested
}

fn decode_record(
    record: &csv::StringRecord,
    policy: &UnsupportedTypePolicy,
) -> Result<Option<QueryDescriptor>, DomainError> {
    let mut fields = record.iter();
    let offset_field = fields
        .next()
        .ok_or_else(|| DomainError::MalformedRecord("empty record".to_string()))?;
    let offset = parse_offset(offset_field)?;

    let descriptor = QueryDescriptor::new(fields, offset)?;

    match descriptor.record_type_token().parse::<RecordType>() {
        Ok(_) => Ok(Some(descriptor)),
        Err(e) => match policy {
            UnsupportedTypePolicy::Skip => {
                warn!(
                    domain = %descriptor.domain(),
                    error = %e,
                    "Skipping record with unsupported type"
                );
                Ok(None)
            }
            UnsupportedTypePolicy::Substitute {
                domain,
                record_type,
            } => {
                debug!(
                    original_domain = %descriptor.domain(),
                    original_type = %descriptor.record_type_token(),
                    substitute = %domain,
                    "Substituting record with unsupported type"
                );
                Ok(Some(descriptor.with_question(domain, record_type)))
            }
        },
    }
}

use crate::parse::{classify, segment, Classified, Parser};
use crate::rules::RuleTable;
use crate::utils::prepare_input;
use crate::{Error, ErrorLevel, ErrorType, KindCounts, Source, SrcFile, Voucher};
use getset::{CopyGetters, Getters};
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

/// The vouchers of a Tally export, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Export {
    /// Returns the vouchers that were built successfully.
    #[getset(get = "pub")]
    vouchers: Vec<Voucher>,

    /// Returns the number of vouchers found per kind, skipped ones included.
    #[getset(get_copy = "pub")]
    found: KindCounts,

    /// Returns the number of vouchers built per kind.
    #[getset(get_copy = "pub")]
    built: KindCounts,
}

fn num_threads() -> usize {
    std::env::var("TALLY2LEDGER_THREADS")
        .ok()
        .and_then(|num| num.parse::<usize>().ok())
        .unwrap_or_else(num_cpus::get)
        .max(1)
}

/// Builds every record, splitting the work over worker threads. Results
/// keep the order of `records`.
fn build_records(records: &[Classified<'_>]) -> Vec<Result<Voucher, Error>> {
    let threads = num_threads();
    if threads == 1 || records.len() < 2 * threads {
        return records.iter().map(Classified::build).collect();
    }
    let chunk_size = (records.len() + threads - 1) / threads;
    log::debug!(
        "Building {} vouchers on {} threads.",
        records.len(),
        threads
    );
    thread::scope(|scope| {
        let handlers = records
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || chunk.iter().map(Classified::build).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();
        handlers
            .into_iter()
            .flat_map(|handler| match handler.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

/// Warns about a voucher without postings on one side.
fn check_sides(voucher: &Voucher) -> Option<Error> {
    let missing = if voucher.debit_postings().is_empty() {
        "debit"
    } else if voucher.credit_postings().is_empty() {
        "credit"
    } else {
        return None;
    };
    Some(Error {
        msg: format!("Voucher has no {} postings.", missing),
        src: voucher.src().clone(),
        r#type: ErrorType::Incomplete,
        level: ErrorLevel::Warning,
        voucher: Some(voucher.ordinal()),
    })
}

impl Export {
    /// Reads and converts the export at `path`.
    ///
    /// A failure that spoils the whole export, such as an unreadable file, a
    /// syntax error or an unsupported voucher kind, is returned as `Err`.
    /// Otherwise the vouchers that failed to decode are left out and reported
    /// in the returned errors together with any warnings.
    pub fn from_file(path: &str) -> Result<(Self, Vec<Error>), Error> {
        let file = Arc::new(path.to_string());
        let bytes = fs::read(path).map_err(|io_error| Error {
            r#type: ErrorType::Io,
            level: ErrorLevel::Error,
            msg: format!("Couldn't read {}: {:?}", path, io_error),
            src: Source::at(&file, (1, 1).into()),
            voucher: None,
        })?;
        Self::from_bytes(&bytes, file)
    }

    /// Converts the raw bytes of an export, see [`prepare_input`].
    pub fn from_bytes(bytes: &[u8], file: SrcFile) -> Result<(Self, Vec<Error>), Error> {
        let text = prepare_input(bytes, &file)?;
        Self::from_str(&text, file)
    }

    /// Converts export text that has already been prepared.
    pub fn from_str(text: &str, file: SrcFile) -> Result<(Self, Vec<Error>), Error> {
        let fields = Parser::parse(text, file.clone())?;
        log::debug!("Parsed {} fields from {}.", fields.len(), file);
        let groups = segment(fields);

        let mut found = KindCounts::default();
        let records = groups
            .iter()
            .map(|group| classify(group, &mut found, &file))
            .collect::<Result<Vec<_>, _>>()?;

        let mut errors = Vec::new();
        let mut vouchers = Vec::with_capacity(records.len());
        let mut built = KindCounts::default();
        for result in build_records(&records) {
            match result {
                Ok(voucher) => {
                    if let Some(warning) = check_sides(&voucher) {
                        errors.push(warning);
                    }
                    built.next(voucher.kind());
                    vouchers.push(voucher);
                }
                Err(error) => errors.push(error),
            }
        }
        Ok((
            Export {
                vouchers,
                found,
                built,
            },
            errors,
        ))
    }

    /// Applies `rules` to every voucher.
    pub fn rewrite(&mut self, rules: &RuleTable) {
        for voucher in self.vouchers.iter_mut() {
            rules.rewrite(voucher);
        }
    }

    /// Number of vouchers that were found but could not be built.
    pub fn skipped(&self) -> usize {
        self.found.total() - self.built.total()
    }

    /// Writes every voucher followed by a blank line.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for voucher in &self.vouchers {
            writeln!(writer, "{}", voucher)?;
            writeln!(writer)?;
        }
        writer.flush()
    }

    /// The ledger text of all vouchers.
    pub fn to_ledger(&self) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

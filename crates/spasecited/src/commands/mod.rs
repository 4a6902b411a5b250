use super::*;

pub mod convert;
pub mod delete;
pub mod get;
pub mod publish;

pub use convert::convert;
pub use delete::delete;
pub use get::get;
pub use publish::publish;

/// Available commands for the CLI.
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Convert a SPASE XML record into a DataCite JSON record on disk
  Convert {
    /// SPASE record to convert: a local XML file or an http(s) URL
    input: String,

    /// Directory the converted record tree is written under
    #[arg(long, short, default_value = "dois")]
    out: PathBuf,

    /// DOI prefix for records without a registered DOI
    /// Example: "10.48322"
    #[arg(long)]
    prefix: Option<String>,

    /// Local SPASE checkout used to resolve PersonID links to ORCID and
    /// affiliation details
    #[arg(long)]
    persons: Option<PathBuf>,
  },

  /// Upload a converted record to DataCite
  Publish {
    /// Path to a converted DataCite JSON record
    record: PathBuf,

    /// DOI state to request: draft leaves the record unregistered
    #[arg(long, value_enum, default_value_t = EventArg::Draft)]
    event: EventArg,

    /// Use the sandbox API (api.test.datacite.org)
    #[arg(long)]
    test: bool,
  },

  /// Delete a draft DOI and the stored record for it
  Delete {
    /// The draft DOI to delete, e.g. "10.48322/xxxx-yyyy"
    doi: String,

    /// SPASE resource ID whose stored JSON should be removed too
    resource_id: Option<String>,

    /// Directory the converted record tree lives under
    #[arg(long, short, default_value = "dois")]
    out: PathBuf,

    /// Use the sandbox API (api.test.datacite.org)
    #[arg(long)]
    test: bool,
  },

  /// Fetch and print the record DataCite holds for a DOI
  Get {
    /// The DOI to look up
    doi: String,

    /// Use the sandbox API (api.test.datacite.org)
    #[arg(long)]
    test: bool,
  },
}

/// DOI states selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventArg {
  /// Leave the DOI as an unregistered draft.
  Draft,
  /// Register the DOI without making it findable.
  Register,
  /// Register the DOI and make it findable.
  Publish,
}

impl EventArg {
  /// The API event to request, if any; drafts need none.
  pub fn event(self) -> Option<DoiEvent> {
    match self {
      Self::Draft => None,
      Self::Register => Some(DoiEvent::Register),
      Self::Publish => Some(DoiEvent::Publish),
    }
  }
}

impl std::fmt::Display for EventArg {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Draft => write!(f, "draft"),
      Self::Register => write!(f, "register"),
      Self::Publish => write!(f, "publish"),
    }
  }
}

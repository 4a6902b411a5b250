use super::*;

/// Uploads a converted record to DataCite.
pub async fn publish(cli: &Cli, record_path: PathBuf, event: EventArg, test: bool) -> Result<()> {
  let mut record = store::load(&record_path)?;
  validate(&record.data.attributes)?;
  record.data.attributes.event = event.event();

  let endpoint = if test { "sandbox" } else { "production" };
  let identity = match record.doi() {
    Some(doi) => format!("DOI {doi}"),
    None => match &record.data.attributes.prefix {
      Some(prefix) => format!("a new DOI under prefix {prefix}"),
      None => "a new DOI under the repository's default prefix".to_string(),
    },
  };
  println!(
    "{} Submitting {} to the {} API as {}",
    style(WORKING_PREFIX).cyan(),
    style(&identity).yellow(),
    style(endpoint).cyan(),
    style(event).magenta()
  );
  if !confirm(cli, "Proceed with the upload?", true)? {
    println!("{} Upload cancelled", style(WARNING_PREFIX).yellow());
    return Ok(());
  }

  let credentials = credentials(cli)?;
  let client = if test {
    DataCiteClient::test(credentials)?
  } else {
    DataCiteClient::new(credentials)?
  };

  // Records that already carry a DOI update it in place; everything else is
  // created fresh.
  let registered = match record.doi().map(str::to_string) {
    Some(doi) => client.update(&doi, &record).await?,
    None => client.create(&record).await?,
  };
  trace!("DataCite returned: {registered:?}");

  match registered.doi() {
    Some(doi) => println!(
      "{} DataCite accepted the record: https://doi.org/{}",
      style(SUCCESS_PREFIX).green(),
      style(doi).blue().underlined()
    ),
    None => println!("{} DataCite accepted the record", style(SUCCESS_PREFIX).green()),
  }
  Ok(())
}

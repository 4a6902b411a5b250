use super::*;

/// Fetches and prints the record DataCite holds for a DOI.
pub async fn get(cli: &Cli, doi: String, test: bool) -> Result<()> {
  println!("{} Fetching DOI {}", style(WORKING_PREFIX).cyan(), style(&doi).yellow());

  let credentials = credentials(cli)?;
  let client = if test {
    DataCiteClient::test(credentials)?
  } else {
    DataCiteClient::new(credentials)?
  };
  let record = client.get(&doi).await?;
  trace!("DataCite returned: {record:?}");

  println!("{}", serde_json::to_string_pretty(&record)?);
  Ok(())
}

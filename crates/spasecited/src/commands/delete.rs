use super::*;

/// Deletes a draft DOI and, optionally, the stored record for it.
pub async fn delete(
  cli: &Cli,
  doi: String,
  resource_id: Option<String>,
  out: PathBuf,
  test: bool,
) -> Result<()> {
  println!(
    "{} Deleting draft DOI {} ({} API)",
    style(WORKING_PREFIX).cyan(),
    style(&doi).yellow(),
    if test { "sandbox" } else { "production" }
  );
  if !confirm(cli, "Really delete this draft?", true)? {
    println!("{} Deletion cancelled", style(WARNING_PREFIX).yellow());
    return Ok(());
  }

  let credentials = credentials(cli)?;
  let client = if test {
    DataCiteClient::test(credentials)?
  } else {
    DataCiteClient::new(credentials)?
  };
  client.delete_draft(&doi).await?;
  println!("{} Draft DOI deleted", style(SUCCESS_PREFIX).green());

  if let Some(resource_id) = resource_id {
    let path = store::remove(&out, &resource_id)?;
    println!(
      "{} Removed stored record {} and pruned empty directories",
      style(SUCCESS_PREFIX).green(),
      path.display()
    );
  }
  Ok(())
}

use super::*;

/// Converts a SPASE record into a DataCite JSON record on disk.
pub async fn convert(
  cli: &Cli,
  input: String,
  out: PathBuf,
  prefix: Option<String>,
  persons: Option<PathBuf>,
) -> Result<()> {
  println!(
    "{} Reading SPASE record from {}",
    style(WORKING_PREFIX).cyan(),
    style(&input).yellow()
  );
  let resource = if input.starts_with("http://") || input.starts_with("https://") {
    SpaseResource::fetch(&input).await?
  } else {
    SpaseResource::from_file(&input)?
  };
  trace!("Scraped resource: {resource:?}");

  println!(
    "{} {} {}",
    style(TREE_BRANCH).dim(),
    style("Resource:").green().bold(),
    style(&resource.resource_id).white()
  );
  if let Some(name) = &resource.name {
    println!(
      "{} {} {}",
      style(TREE_BRANCH).dim(),
      style("Title:").green().bold(),
      style(name).white()
    );
  }
  println!(
    "{} {} {}",
    style(TREE_LEAF).dim(),
    style("Type:").green().bold(),
    style(&resource.kind).white()
  );

  if resource.doi.is_some() && prefix.is_some() && !cli.accept_defaults {
    println!(
      "{} Record already carries a DOI; the --prefix value will be ignored",
      style(WARNING_PREFIX).yellow()
    );
  }

  let options =
    MapOptions { prefix, event: None, persons: persons.map(PersonDirectory::new) };
  let record = map_resource(&resource, &options)?;
  let path = store::save(&record, &out, &resource.resource_id)?;

  let attributes = &record.data.attributes;
  println!("{} Converted record written to {}", style(SUCCESS_PREFIX).green(), path.display());
  println!(
    "{} {} creator(s), {} contributor(s), {} related identifier(s)",
    style(INFO_PREFIX).cyan(),
    attributes.creators.len(),
    attributes.contributors.len(),
    attributes.related_identifiers.len()
  );
  Ok(())
}

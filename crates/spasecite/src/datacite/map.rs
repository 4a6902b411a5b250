//! The SPASE → DataCite field mapping.
//!
//! [`map_resource`] is the heart of the crate: a deterministic, side-effect
//! free transform from a scraped [`SpaseResource`] to a submission-ready
//! [`DataCiteRecord`]. The mapping rules are fixed in code, not data-driven,
//! and every collection is emitted in source-document order so the same
//! input always serializes to the same bytes.
//!
//! Vocabulary translations live here too: SPASE contact roles to DataCite
//! contributorTypes, SPASE association types to DataCite relationTypes, and
//! the small table of publishers with known ROR identifiers.

use crate::spase::{
  landing_page_url, parse_spase_datetime, split_person_name, AssociationKind, PersonDirectory,
  ResourceKind, SpaseResource,
};

use super::*;

/// Contact roles considered authorship, in priority order. Creators are
/// drawn from the first role in this list that any contact carries.
const AUTHOR_ROLES: [&str; 7] = [
  "Author",
  "PrincipalInvestigator",
  "MissionPrincipalInvestigator",
  "CoPI",
  "DeputyPI",
  "FormerPI",
  "CoInvestigator",
];

lazy_static! {
  /// Author lists sometimes join names with `and`/`&` instead of semicolons.
  static ref AND_SEPARATOR: Regex = Regex::new(r"\s+(?:and|&)\s+").unwrap();
}

/// Settings that vary per conversion run.
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
  /// DOI prefix for records without a registered DOI; DataCite assigns the
  /// suffix at creation time.
  pub prefix:  Option<String>,
  /// State transition to request alongside the metadata. `None` leaves new
  /// records as drafts.
  pub event:   Option<DoiEvent>,
  /// Local SPASE checkout for resolving `PersonID` links to ORCID and
  /// affiliation details.
  pub persons: Option<PersonDirectory>,
}

/// Maps a scraped SPASE resource into a DataCite record.
///
/// The record is validated before it is returned: a resource missing any
/// field DataCite requires (title, creator, publisher, publication year,
/// URL) yields [`SpaseciteError::MissingField`] naming the SPASE location
/// that should have provided it, never a malformed record.
///
/// # Errors
///
/// Returns [`SpaseciteError::MissingField`] when a required field cannot be
/// derived from the resource.
pub fn map_resource(resource: &SpaseResource, options: &MapOptions) -> Result<DataCiteRecord> {
  let mut attributes = DoiAttributes {
    url: resource.landing_page(),
    ..Default::default()
  };

  // Identifier: reuse a registered DOI, otherwise carry the prefix so
  // DataCite auto-assigns a suffix.
  match &resource.doi {
    Some(doi) => attributes.doi = Some(strip_doi_url(doi)),
    None => attributes.prefix = options.prefix.clone(),
  }
  attributes.event = options.event;

  // Titles.
  if let Some(name) = &resource.name {
    attributes.titles.push(Title { title: name.clone(), title_type: None });
  }
  if let Some(alternate) = &resource.alternate_name {
    attributes.titles.push(Title {
      title:      alternate.clone(),
      title_type: Some("AlternativeTitle".to_string()),
    });
  }

  // Creators: a PublicationInfo author list takes precedence over contacts.
  let authors = resource.publication.as_ref().and_then(|p| p.authors.as_deref());
  let mut creator_ids: Vec<&str> = Vec::new();
  if let Some(authors) = authors {
    for author in split_author_list(authors) {
      attributes.creators.push(creator_from_author(&author));
    }
  } else {
    for role in AUTHOR_ROLES {
      let tier: Vec<_> =
        resource.contacts.iter().filter(|c| c.roles.iter().any(|r| r == role)).collect();
      if tier.is_empty() {
        continue;
      }
      for contact in tier {
        creator_ids.push(contact.person_id.as_str());
        attributes.creators.push(creator_from_person(
          &contact.person_id,
          options.persons.as_ref(),
        ));
      }
      break;
    }
  }

  attributes.contributors = map_contributors(resource, &creator_ids, options.persons.as_ref());

  // Publisher, with ROR identifiers for the repositories we know.
  let publisher_name = resource
    .publication
    .as_ref()
    .and_then(|p| p.published_by.clone())
    .or_else(|| {
      resource
        .contacts
        .iter()
        .find(|c| c.roles.iter().any(|r| r == "Publisher"))
        .map(|c| split_person_name(&c.person_id).0)
    })
    .or_else(|| {
      resource
        .access
        .iter()
        .find_map(|a| a.repository_id.as_deref())
        .and_then(|id| id.rsplit('/').next())
        .map(str::to_string)
    })
    .unwrap_or_default();
  attributes.publisher = match known_publisher_ror(&publisher_name) {
    Some(ror) => Publisher {
      name:                        publisher_name,
      publisher_identifier:        Some(format!("https://ror.org/{ror}")),
      publisher_identifier_scheme: Some("ROR".to_string()),
      scheme_uri:                  Some("https://ror.org".to_string()),
    },
    None => Publisher { name: publisher_name, ..Default::default() },
  };

  // Dates. Created comes from the earliest revision, Issued from the
  // publication date (falling back to Created, then the release date), and
  // the publication year is derived from Issued.
  let created = resource
    .revision_dates
    .iter()
    .filter_map(|raw| parse_spase_datetime(raw).map(|parsed| (parsed, raw)))
    .min_by_key(|(parsed, _)| *parsed)
    .map(|(_, raw)| raw.as_str());
  let issued = resource
    .publication
    .as_ref()
    .and_then(|p| p.publication_date.as_deref())
    .or(created)
    .or(resource.release_date.as_deref());
  if let Some(date) = created.and_then(normalize_date) {
    attributes.dates.push(DataCiteDate {
      date,
      date_type: "Created".to_string(),
      date_information: None,
    });
  }
  if let Some(date) = issued.and_then(normalize_date) {
    attributes.dates.push(DataCiteDate {
      date,
      date_type: "Issued".to_string(),
      date_information: None,
    });
  }
  if let Some(date) = resource.release_date.as_deref().and_then(normalize_date) {
    attributes.dates.push(DataCiteDate {
      date,
      date_type: "Updated".to_string(),
      date_information: None,
    });
  }
  if let Some(range) = collected_range(resource) {
    attributes.dates.push(DataCiteDate {
      date:             range,
      date_type:        "Collected".to_string(),
      date_information: Some("Temporal coverage of the dataset".to_string()),
    });
  }
  attributes.publication_year = issued
    .and_then(parse_spase_datetime)
    .map(|d| d.year())
    .unwrap_or_default();

  // Types.
  attributes.types = ResourceTypes {
    resource_type:         Some(resource.kind.to_string()),
    resource_type_general: match resource.kind {
      ResourceKind::Collection => "Collection".to_string(),
      _ => "Dataset".to_string(),
    },
  };

  // Subjects: free keywords, then measurement types and observed regions
  // under their SPASE schemes.
  for keyword in &resource.keywords {
    attributes.subjects.push(Subject { subject: keyword.clone(), subject_scheme: None });
  }
  for measurement in &resource.measurement_types {
    attributes.subjects.push(Subject {
      subject:        measurement.clone(),
      subject_scheme: Some("SPASE MeasurementType".to_string()),
    });
  }
  for region in &resource.observed_regions {
    attributes.subjects.push(Subject {
      subject:        region.clone(),
      subject_scheme: Some("SPASE Region".to_string()),
    });
  }
  for region in &resource.observed_regions {
    attributes
      .geo_locations
      .push(GeoLocation { geo_location_place: region.replace('.', " ") });
  }

  // Alternate and related identifiers.
  attributes.alternate_identifiers.push(AlternateIdentifier {
    alternate_identifier:      resource.resource_id.clone(),
    alternate_identifier_type: "SPASE ResourceID".to_string(),
  });
  for association in &resource.associations {
    attributes.related_identifiers.push(RelatedIdentifier {
      related_identifier:      landing_page_url(&association.resource_id),
      related_identifier_type: "URL".to_string(),
      relation_type:           relation_type(&association.kind).to_string(),
    });
  }
  for prior in &resource.prior_ids {
    attributes.related_identifiers.push(RelatedIdentifier {
      related_identifier:      landing_page_url(prior),
      related_identifier_type: "URL".to_string(),
      relation_type:           "IsPreviousVersionOf".to_string(),
    });
  }
  for instrument in &resource.instrument_ids {
    attributes.related_identifiers.push(RelatedIdentifier {
      related_identifier:      landing_page_url(instrument),
      related_identifier_type: "URL".to_string(),
      relation_type:           "IsCollectedBy".to_string(),
    });
  }

  // Formats and rights, de-duplicated in document order.
  for access in &resource.access {
    for format in &access.formats {
      if !attributes.formats.contains(format) {
        attributes.formats.push(format.clone());
      }
    }
    for rights in &access.rights {
      let entry = RightsEntry {
        rights:                   (!rights.text.is_empty()).then(|| rights.text.clone()),
        rights_uri:               rights.rights_uri.clone(),
        rights_identifier:        rights.rights_identifier.clone(),
        rights_identifier_scheme: rights.rights_identifier_scheme.clone(),
        scheme_uri:               rights.scheme_uri.clone(),
      };
      if !attributes.rights_list.contains(&entry) {
        attributes.rights_list.push(entry);
      }
    }
  }

  // Description.
  if let Some(description) = &resource.description {
    attributes.descriptions.push(Description {
      description:      description.clone(),
      description_type: "Abstract".to_string(),
    });
  }

  // Funding.
  for funding in &resource.funding {
    if let Some(agency) = &funding.agency {
      attributes.funding_references.push(FundingReference {
        funder_name:  agency.clone(),
        award_number: funding.award_number.clone(),
        award_title:  funding.project.clone(),
      });
    }
  }

  attributes.schema_version = resource.schema_version.clone();

  validate(&attributes)?;
  Ok(DataCiteRecord::new(attributes))
}

/// Checks the fields DataCite requires before a record may be submitted.
///
/// # Errors
///
/// Returns [`SpaseciteError::MissingField`] naming the SPASE location that
/// should have provided the missing value.
pub fn validate(attributes: &DoiAttributes) -> Result<()> {
  if attributes.titles.is_empty() {
    return Err(SpaseciteError::MissingField("ResourceHeader/ResourceName".to_string()));
  }
  if attributes.creators.is_empty() {
    return Err(SpaseciteError::MissingField(
      "PublicationInfo/Authors or a Contact with an author role".to_string(),
    ));
  }
  if attributes.publisher.name.is_empty() {
    return Err(SpaseciteError::MissingField(
      "PublicationInfo/PublishedBy or AccessInformation/RepositoryID".to_string(),
    ));
  }
  if attributes.publication_year == 0 {
    return Err(SpaseciteError::MissingField(
      "PublicationInfo/PublicationDate or ResourceHeader/ReleaseDate".to_string(),
    ));
  }
  if attributes.url.is_empty() {
    return Err(SpaseciteError::MissingField("ResourceID".to_string()));
  }
  if attributes.types.resource_type_general.is_empty() {
    return Err(SpaseciteError::MissingField(
      "resource description element for types/resourceTypeGeneral".to_string(),
    ));
  }
  Ok(())
}

/// Translates a SPASE contact role into a DataCite contributorType.
///
/// Roles in [`AUTHOR_ROLES`] are not contributor roles, with one exception:
/// `CoInvestigator` counts as a [`ContributorType::ProjectMember`] when it
/// did not already make the person a creator.
pub fn role_to_contributor(role: &str) -> Option<ContributorType> {
  match role {
    "GeneralContact" | "HostContact" | "MetadataContact" | "TechnicalContact" =>
      Some(ContributorType::ContactPerson),
    "DataProducer" => Some(ContributorType::DataCollector),
    "ArchiveSpecialist" => Some(ContributorType::DataCurator),
    "TeamLeader" => Some(ContributorType::ProjectLeader),
    "InstrumentLead" | "MissionManager" | "ProgramManager" | "ProjectManager" =>
      Some(ContributorType::ProjectManager),
    "Contributor" | "Developer" | "InstrumentScientist" | "ProgramScientist"
    | "ProjectEngineer" | "ProjectScientist" | "Scientist" | "TeamMember" | "CoInvestigator" =>
      Some(ContributorType::ProjectMember),
    _ => None,
  }
}

/// Translates a SPASE association kind into a DataCite relationType.
pub fn relation_type(kind: &AssociationKind) -> &'static str {
  match kind {
    AssociationKind::RevisionOf => "IsNewVersionOf",
    AssociationKind::DerivedFrom | AssociationKind::ChildEventOf => "IsDerivedFrom",
    AssociationKind::PartOf => "IsPartOf",
    AssociationKind::Other(_) => "References",
  }
}

/// Splits a `PublicationInfo/Authors` string into individual author names.
///
/// Archives use three conventions: semicolon-separated `Family, Given`
/// lists, comma-separated lists split after each initial's period, and
/// `and`/`&`-joined pairs. Trailing separators are dropped.
pub fn split_author_list(authors: &str) -> Vec<String> {
  let trimmed = authors.trim().trim_end_matches(';').trim();
  let parts: Vec<String> = if trimmed.contains("; ") {
    trimmed.split("; ").map(str::to_string).collect()
  } else if trimmed.contains("., ") {
    let mut parts = Vec::new();
    let mut rest = trimmed;
    while let Some(idx) = rest.find("., ") {
      parts.push(format!("{}.", &rest[..idx]));
      rest = &rest[idx + 3..];
    }
    parts.push(rest.to_string());
    parts
  } else {
    AND_SEPARATOR.split(trimmed).map(str::to_string).collect()
  };
  parts
    .into_iter()
    .map(|p| p.trim().trim_end_matches(',').trim().to_string())
    .filter(|p| !p.is_empty())
    .collect()
}

/// Builds a creator from one entry of an author list. Names without a
/// `Family, Given` comma are treated as organizations.
fn creator_from_author(author: &str) -> Creator {
  match author.split_once(", ") {
    Some((family, given)) => Creator {
      name:             author.to_string(),
      name_type:        Some(NameType::Personal),
      given_name:       Some(given.to_string()),
      family_name:      Some(family.to_string()),
      name_identifiers: Vec::new(),
      affiliation:      Vec::new(),
    },
    None => Creator {
      name:             author.to_string(),
      name_type:        Some(NameType::Organizational),
      given_name:       None,
      family_name:      None,
      name_identifiers: Vec::new(),
      affiliation:      Vec::new(),
    },
  }
}

/// Builds a creator from a contact's person ID, enriched with ORCID and
/// affiliation when the person record resolves locally.
fn creator_from_person(person_id: &str, persons: Option<&PersonDirectory>) -> Creator {
  let (name, name_type, given_name, family_name, name_identifiers, affiliation) =
    person_parts(person_id, persons);
  Creator { name, name_type: Some(name_type), given_name, family_name, name_identifiers, affiliation }
}

/// Name fields shared between creators and contributors.
type PersonParts =
  (String, NameType, Option<String>, Option<String>, Vec<NameIdentifier>, Vec<Affiliation>);

/// Splits a person ID into DataCite name fields and resolves identity
/// details against the local person directory.
fn person_parts(person_id: &str, persons: Option<&PersonDirectory>) -> PersonParts {
  let (full, given, family) = split_person_name(person_id);
  let (name, name_type, given_name, family_name) = if family.is_empty() {
    (full, NameType::Organizational, None, None)
  } else {
    (format!("{family}, {given}"), NameType::Personal, Some(given), Some(family))
  };

  let mut name_identifiers = Vec::new();
  let mut affiliation = Vec::new();
  if let Some(details) = persons.and_then(|d| d.resolve(person_id)) {
    if let Some(orcid) = &details.orcid {
      name_identifiers.push(NameIdentifier::orcid(orcid));
    }
    if let Some(org) = &details.affiliation {
      affiliation.push(match &details.ror {
        Some(ror) => Affiliation::with_ror(org, ror),
        None => Affiliation::named(org),
      });
    }
  }
  (name, name_type, given_name, family_name, name_identifiers, affiliation)
}

/// Builds the contributor list from the resource's contacts and repository.
fn map_contributors(
  resource: &SpaseResource,
  creator_ids: &[&str],
  persons: Option<&PersonDirectory>,
) -> Vec<Contributor> {
  let mut contributors = Vec::new();
  for contact in &resource.contacts {
    let mut seen: Vec<ContributorType> = Vec::new();
    for role in &contact.roles {
      // CoInvestigator only contributes when it did not already make this
      // person a creator.
      if role == "CoInvestigator" && creator_ids.contains(&contact.person_id.as_str()) {
        continue;
      }
      if AUTHOR_ROLES.contains(&role.as_str()) && role != "CoInvestigator" {
        continue;
      }
      let Some(contributor_type) = role_to_contributor(role) else {
        debug!("No contributorType for role {role}, skipping");
        continue;
      };
      if seen.contains(&contributor_type) {
        continue;
      }
      seen.push(contributor_type);
      let (name, name_type, given_name, family_name, name_identifiers, affiliation) =
        person_parts(&contact.person_id, persons);
      contributors.push(Contributor {
        contributor_type,
        name,
        name_type: Some(name_type),
        given_name,
        family_name,
        name_identifiers,
        affiliation,
      });
    }
  }

  // Repositories appear as hosting institutions.
  let mut seen_repos: Vec<&str> = Vec::new();
  for repository in resource.access.iter().filter_map(|a| a.repository_id.as_deref()) {
    if seen_repos.contains(&repository) {
      continue;
    }
    seen_repos.push(repository);
    if let Some(name) = repository.rsplit('/').next() {
      contributors.push(Contributor {
        contributor_type: ContributorType::HostingInstitution,
        name:             name.to_string(),
        name_type:        Some(NameType::Organizational),
        given_name:       None,
        family_name:      None,
        name_identifiers: Vec::new(),
        affiliation:      Vec::new(),
      });
    }
  }
  contributors
}

/// Publishers with known ROR identifiers.
fn known_publisher_ror(name: &str) -> Option<&'static str> {
  match name {
    "Space Physics Data Facility" | "NASA Space Physics Data Facility" | "SPDF" =>
      Some("00ryjtt64"),
    "Solar Data Analysis Center" | "NASA Solar Data Analysis Center" | "SDAC" =>
      Some("04rvfc379"),
    _ => None,
  }
}

/// Normalizes a SPASE timestamp for DataCite: `Z` and fractional seconds
/// stripped, bare dates kept bare.
fn normalize_date(raw: &str) -> Option<String> {
  let parsed = parse_spase_datetime(raw)?;
  Some(if raw.contains('T') {
    parsed.format("%Y-%m-%dT%H:%M:%S").to_string()
  } else {
    parsed.format("%Y-%m-%d").to_string()
  })
}

/// The temporal coverage as a DataCite date range, open-ended for ongoing
/// datasets.
fn collected_range(resource: &SpaseResource) -> Option<String> {
  let start = parse_spase_datetime(resource.time_span.start_date.as_deref()?)?;
  let stop = resource.time_span.stop_date.as_deref().and_then(parse_spase_datetime);
  Some(match stop {
    Some(stop) => format!("{}/{}", start.format("%Y-%m-%d"), stop.format("%Y-%m-%d")),
    None => format!("{}/", start.format("%Y-%m-%d")),
  })
}

/// Reduces a DOI to its registrable form, dropping any resolver prefix.
fn strip_doi_url(doi: &str) -> String {
  let trimmed = doi.trim();
  for prefix in ["https://doi.org/", "http://doi.org/", "doi:"] {
    if let Some(stripped) = trimmed.strip_prefix(prefix) {
      return stripped.to_string();
    }
  }
  trimmed.to_string()
}

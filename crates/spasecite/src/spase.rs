//! SPASE resource descriptions and the XML scraper that reads them.
//!
//! SPASE (Space Physics Archive Search and Extract) records are XML documents
//! with a `Spase` root wrapping a single resource description element such as
//! `NumericalData` or `Collection`. This module provides:
//!
//! - [`SpaseResource`]: a typed view of the metadata fields needed for DOI
//!   registration
//! - Scraping from a string, a local file, or a URL
//! - [`PersonDirectory`]: resolution of `PersonID` references against a local
//!   SPASE checkout to recover ORCID and affiliation details
//!
//! The scraper is event-driven rather than schema-bound: it walks the
//! document with an element path stack and collects the subset of fields the
//! DataCite mapping needs, tolerating the considerable variation found in
//! real SPASE archives (absent sections, repeated contacts, date strings with
//! and without `Z` suffixes or fractional seconds).
//!
//! # Examples
//!
//! ```no_run
//! use spasecite::spase::SpaseResource;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resource = SpaseResource::from_file("NumericalData/ACE/MAG/L2/PT16S.xml")?;
//! println!("Title: {}", resource.name.as_deref().unwrap_or("<unnamed>"));
//! println!("Landing page: {}", resource.landing_page());
//! # Ok(())
//! # }
//! ```

use quick_xml::{events::Event, Reader};

use super::*;

/// Base URL of the landing-page service that resolves SPASE resource IDs.
pub const LANDING_PAGE_BASE: &str = "https://spase-metadata.org/";

/// The resource description element found under the `Spase` root.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ResourceKind {
  /// Numerical dataset descriptions, the common case for DOI registration.
  NumericalData,
  /// Display-oriented (image/plot) dataset descriptions.
  DisplayData,
  /// Observatory descriptions, referenced from datasets via `ObservatoryID`.
  Observatory,
  /// Instrument descriptions, referenced from datasets via `InstrumentID`.
  Instrument,
  /// Collections grouping several other resources.
  Collection,
  /// Person records holding ORCID and affiliation details.
  Person,
}

impl ResourceKind {
  /// Element names recognized as resource descriptions, in document order of
  /// preference when several appear (the last one wins, matching the archive
  /// convention of one description per file).
  fn from_element(name: &str) -> Option<Self> {
    match name {
      "NumericalData" => Some(Self::NumericalData),
      "DisplayData" => Some(Self::DisplayData),
      "Observatory" => Some(Self::Observatory),
      "Instrument" => Some(Self::Instrument),
      "Collection" => Some(Self::Collection),
      "Person" => Some(Self::Person),
      _ => None,
    }
  }
}

impl Display for ResourceKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NumericalData => write!(f, "NumericalData"),
      Self::DisplayData => write!(f, "DisplayData"),
      Self::Observatory => write!(f, "Observatory"),
      Self::Instrument => write!(f, "Instrument"),
      Self::Collection => write!(f, "Collection"),
      Self::Person => write!(f, "Person"),
    }
  }
}

/// A contact listed in the resource header, with every role it carries.
///
/// Contacts sharing a `PersonID` across multiple `Contact` elements are
/// merged into a single entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
  /// SPASE person identifier, e.g. `spase://SMWG/Person/Jane.E.Doe`.
  pub person_id: String,
  /// Roles such as `PrincipalInvestigator`, `MetadataContact`, `Publisher`.
  pub roles:     Vec<String>,
}

/// The `PublicationInfo` block, the preferred source for citation metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationInfo {
  /// Author list as a single string, delimiter conventions vary.
  pub authors:          Option<String>,
  /// Publication timestamp, ISO 8601 with optional `Z`.
  pub publication_date: Option<String>,
  /// Publishing organization name.
  pub published_by:     Option<String>,
  /// Publication title when it differs from the resource name.
  pub title:            Option<String>,
}

/// A supporting link from the resource header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InformationUrl {
  /// Short label for the link.
  pub name:        Option<String>,
  /// The link itself.
  pub url:         String,
  /// Longer description of what the link provides.
  pub description: Option<String>,
}

/// A `Rights` entry from an `AccessInformation/RightsList`, carrying the
/// SPDX-style attributes SPASE adopted for licensing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaseRights {
  /// Human-readable license name (element text).
  pub text:                    String,
  /// `rightsURI` attribute, e.g. an spdx.org license page.
  pub rights_uri:              Option<String>,
  /// `rightsIdentifier` attribute, e.g. `CC0-1.0`.
  pub rights_identifier:       Option<String>,
  /// `rightsIdentifierScheme` attribute, typically `SPDX`.
  pub rights_identifier_scheme: Option<String>,
  /// `schemeURI` attribute, typically `https://spdx.org/licenses/`.
  pub scheme_uri:              Option<String>,
}

/// An `AccessURL` with any product keys scoping it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessUrl {
  /// Short label for the access point.
  pub name:         Option<String>,
  /// URL of the access point.
  pub url:          String,
  /// Product keys selecting datasets behind a shared service URL.
  pub product_keys: Vec<String>,
}

/// One `AccessInformation` block: a repository and how to reach its data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessInformation {
  /// Repository resource ID hosting these access points.
  pub repository_id: Option<String>,
  /// `AccessRights` values, e.g. `Open`.
  pub access_rights: Vec<String>,
  /// Data formats served, e.g. `CDF`, `CSV`.
  pub formats:       Vec<String>,
  /// License entries.
  pub rights:        Vec<SpaseRights>,
  /// Access points.
  pub urls:          Vec<AccessUrl>,
}

/// Relationship kinds found in `Association/AssociationType`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum AssociationKind {
  /// This resource revises the associated one.
  RevisionOf,
  /// This resource was derived from the associated one.
  DerivedFrom,
  /// This resource is a child event of the associated one.
  ChildEventOf,
  /// This resource is a portion of the associated one.
  PartOf,
  /// Any other association, with the raw type preserved.
  Other(String),
}

impl From<&str> for AssociationKind {
  fn from(s: &str) -> Self {
    match s {
      "RevisionOf" => Self::RevisionOf,
      "DerivedFrom" => Self::DerivedFrom,
      "ChildEventOf" => Self::ChildEventOf,
      "PartOf" => Self::PartOf,
      other => Self::Other(other.to_string()),
    }
  }
}

/// A typed `Association` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Association {
  /// Resource ID of the associated record.
  pub resource_id: String,
  /// How the records relate.
  pub kind:        AssociationKind,
}

/// One `Funding` block from the resource header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Funding {
  /// Funding agency name.
  pub agency:       Option<String>,
  /// Funded project name.
  pub project:      Option<String>,
  /// Grant or award number.
  pub award_number: Option<String>,
}

/// A measured parameter (name, description, units).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
  /// Parameter name.
  pub name:        Option<String>,
  /// First line of the parameter description.
  pub description: Option<String>,
  /// Units of measure.
  pub units:       Option<String>,
}

/// Temporal coverage from `TemporalDescription/TimeSpan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSpan {
  /// Coverage start, ISO 8601.
  pub start_date: Option<String>,
  /// Coverage stop; absent for ongoing datasets.
  pub stop_date:  Option<String>,
  /// Measurement cadence, ISO 8601 duration.
  pub cadence:    Option<String>,
}

/// Identity details scraped from a SPASE `Person` record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonDetails {
  /// ORCID identifier, bare (no `https://orcid.org/` prefix).
  pub orcid:       Option<String>,
  /// Organization the person is affiliated with.
  pub affiliation: Option<String>,
  /// ROR identifier of the affiliation, bare.
  pub ror:         Option<String>,
}

/// Typed view of one SPASE resource description.
///
/// Every field is optional except the resource ID and kind: presence
/// validation against DataCite's requirements happens in the mapper, not
/// here, so a sparse record can still be inspected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaseResource {
  /// Which description element this record carries.
  pub kind:              ResourceKind,
  /// SPASE schema version from `Spase/Version`.
  pub schema_version:    Option<String>,
  /// Metadata license from the root `rights` attribute, when declared.
  pub metadata_rights:   Option<String>,
  /// The `ResourceID`, e.g. `spase://NASA/NumericalData/ACE/MAG/L2/PT16S`.
  pub resource_id:       String,
  /// `ResourceHeader/ResourceName`.
  pub name:              Option<String>,
  /// `ResourceHeader/AlternateName`.
  pub alternate_name:    Option<String>,
  /// `ResourceHeader/Description`.
  pub description:       Option<String>,
  /// `ResourceHeader/DOI`, a full `https://doi.org/...` URL when present.
  pub doi:               Option<String>,
  /// `ResourceHeader/PriorID` values superseded by this record.
  pub prior_ids:         Vec<String>,
  /// `ResourceHeader/ReleaseDate`, the last-modified timestamp.
  pub release_date:      Option<String>,
  /// `ReleaseDate` values from `RevisionHistory`, oldest-first not guaranteed.
  pub revision_dates:    Vec<String>,
  /// Supporting links.
  pub information_urls:  Vec<InformationUrl>,
  /// Contacts with roles, merged by person ID.
  pub contacts:          Vec<Contact>,
  /// Publication info block, when present.
  pub publication:       Option<PublicationInfo>,
  /// Funding blocks.
  pub funding:           Vec<Funding>,
  /// Access information blocks.
  pub access:            Vec<AccessInformation>,
  /// Temporal coverage.
  pub time_span:         TimeSpan,
  /// `ObservedRegion` taxonomy values, e.g. `Heliosphere.Inner`.
  pub observed_regions:  Vec<String>,
  /// Free-text keywords.
  pub keywords:          Vec<String>,
  /// `MeasurementType` values.
  pub measurement_types: Vec<String>,
  /// Instrument resource IDs this dataset was collected by.
  pub instrument_ids:    Vec<String>,
  /// Typed associations to other resources.
  pub associations:      Vec<Association>,
  /// Measured parameters.
  pub parameters:        Vec<Parameter>,
  /// Person identity details, populated only for [`ResourceKind::Person`].
  pub person:            Option<PersonDetails>,
}

impl SpaseResource {
  /// Scrapes a SPASE resource description from an XML string.
  ///
  /// The scraper walks the document once, tracking its position with an
  /// element path stack and ignoring namespace prefixes, so records using
  /// either a default or a prefixed SPASE namespace parse identically.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::InvalidResource`] if the XML is malformed or
  /// contains no recognized description element, and
  /// [`SpaseciteError::MissingField`] if the description lacks a
  /// `ResourceID`.
  pub fn from_xml_str(xml: &str) -> Result<Self> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();

    let mut kind: Option<ResourceKind> = None;
    let mut schema_version = None;
    let mut metadata_rights = None;
    let mut resource_id = String::new();
    let mut name = None;
    let mut alternate_name = None;
    let mut description = None;
    let mut doi = None;
    let mut prior_ids = Vec::new();
    let mut release_date = None;
    let mut revision_dates = Vec::new();
    let mut information_urls = Vec::new();
    let mut contacts: Vec<Contact> = Vec::new();
    let mut publication = None;
    let mut funding = Vec::new();
    let mut access = Vec::new();
    let mut time_span = TimeSpan::default();
    let mut observed_regions = Vec::new();
    let mut keywords = Vec::new();
    let mut measurement_types = Vec::new();
    let mut instrument_ids = Vec::new();
    let mut associations = Vec::new();
    let mut parameters = Vec::new();
    let mut person = PersonDetails::default();

    // In-flight builders for repeatable container elements.
    let mut cur_contact: Option<Contact> = None;
    let mut cur_pubinfo: Option<PublicationInfo> = None;
    let mut cur_access: Option<AccessInformation> = None;
    let mut cur_access_url: Option<AccessUrl> = None;
    let mut cur_rights: Option<SpaseRights> = None;
    let mut cur_info_url: Option<InformationUrl> = None;
    let mut cur_funding: Option<Funding> = None;
    let mut cur_param: Option<Parameter> = None;
    let mut cur_assoc_id = String::new();
    let mut cur_assoc_kind = String::new();

    loop {
      match reader.read_event() {
        Ok(Event::Start(e)) => {
          let elem = local_name(e.name().as_ref());

          if path.is_empty() {
            if elem != "Spase" {
              return Err(SpaseciteError::InvalidResource(format!(
                "expected Spase root element, found {elem}"
              )));
            }
            // The metadata license rides on the root as an xsi:rights-style
            // attribute.
            for attr in e.attributes().flatten() {
              if local_name(attr.key.as_ref()) == "rights" {
                metadata_rights = attr.unescape_value().ok().map(|v| v.into_owned());
              }
            }
          } else if path.len() == 1 {
            if let Some(k) = ResourceKind::from_element(&elem) {
              kind = Some(k);
            }
          }

          match elem.as_str() {
            "Contact" => cur_contact = Some(Contact::default()),
            "PublicationInfo" => cur_pubinfo = Some(PublicationInfo::default()),
            "AccessInformation" => cur_access = Some(AccessInformation::default()),
            "AccessURL" => cur_access_url = Some(AccessUrl::default()),
            "InformationURL" => cur_info_url = Some(InformationUrl::default()),
            "Funding" => cur_funding = Some(Funding::default()),
            "Parameter" if path.len() == 2 => cur_param = Some(Parameter::default()),
            "Association" => {
              cur_assoc_id.clear();
              cur_assoc_kind.clear();
            },
            "Rights" => {
              let mut rights = SpaseRights::default();
              for attr in e.attributes().flatten() {
                let value = match attr.unescape_value() {
                  Ok(v) => v.into_owned(),
                  Err(_) => continue,
                };
                match local_name(attr.key.as_ref()).as_str() {
                  "rightsURI" => rights.rights_uri = Some(value),
                  "rightsIdentifier" => rights.rights_identifier = Some(value),
                  "rightsIdentifierScheme" => rights.rights_identifier_scheme = Some(value),
                  "schemeURI" => rights.scheme_uri = Some(value),
                  _ => (),
                }
              }
              cur_rights = Some(rights);
            },
            _ => (),
          }

          path.push(elem);
        },

        Ok(Event::Text(e)) => {
          let Ok(raw) = e.unescape() else { continue };
          let text = raw.trim();
          if text.is_empty() {
            continue;
          }
          let Some(elem) = path.last() else { continue };
          let elem = elem.as_str();

          // Builders first: their child element names (Name, Description,
          // URL) collide with header-level fields.
          if let Some(rights) = cur_rights.as_mut() {
            rights.text.push_str(text);
            continue;
          }
          if let Some(param) = cur_param.as_mut() {
            match elem {
              "Name" => param.name = Some(text.to_string()),
              // Only the first line; parameter descriptions run long.
              "Description" =>
                param.description = text.lines().next().map(|l| l.trim().to_string()),
              "Units" => param.units = Some(text.to_string()),
              _ => (),
            }
            continue;
          }
          if let Some(info) = cur_info_url.as_mut() {
            match elem {
              "Name" => info.name = Some(text.to_string()),
              "URL" => info.url = text.to_string(),
              "Description" => info.description = Some(text.to_string()),
              _ => (),
            }
            continue;
          }
          if let Some(access_url) = cur_access_url.as_mut() {
            match elem {
              "Name" => access_url.name = Some(text.to_string()),
              "URL" => access_url.url = text.to_string(),
              "ProductKey" => access_url.product_keys.push(text.to_string()),
              _ => (),
            }
            continue;
          }
          if let Some(contact) = cur_contact.as_mut() {
            match elem {
              "PersonID" => contact.person_id = text.to_string(),
              "Role" => contact.roles.push(text.to_string()),
              _ => (),
            }
            continue;
          }
          if let Some(pubinfo) = cur_pubinfo.as_mut() {
            match elem {
              "Authors" => pubinfo.authors = Some(text.to_string()),
              "PublicationDate" => pubinfo.publication_date = Some(text.to_string()),
              "PublishedBy" => pubinfo.published_by = Some(text.to_string()),
              "Title" => pubinfo.title = Some(text.to_string()),
              _ => (),
            }
            continue;
          }
          if let Some(fund) = cur_funding.as_mut() {
            match elem {
              "Agency" => fund.agency = Some(text.to_string()),
              "Project" => fund.project = Some(text.to_string()),
              "AwardNumber" => fund.award_number = Some(text.to_string()),
              _ => (),
            }
            continue;
          }
          if let Some(acc) = cur_access.as_mut() {
            match elem {
              "RepositoryID" => acc.repository_id = Some(text.to_string()),
              "Format" => acc.formats.push(text.to_string()),
              "AccessRights" => acc.access_rights.push(text.to_string()),
              _ => (),
            }
            if matches!(elem, "RepositoryID" | "Format" | "AccessRights") {
              continue;
            }
          }
          if in_path(&path, "Association") {
            match elem {
              "AssociationID" => cur_assoc_id = text.to_string(),
              "AssociationType" => cur_assoc_kind = text.to_string(),
              _ => (),
            }
            continue;
          }
          if in_path(&path, "RevisionHistory") {
            if elem == "ReleaseDate" {
              revision_dates.push(text.to_string());
            }
            continue;
          }

          match elem {
            "Version" if path.len() == 2 => schema_version = Some(text.to_string()),
            "ResourceID" if path.len() == 3 => resource_id = text.to_string(),
            "ResourceName" => name = Some(text.to_string()),
            "AlternateName" => alternate_name = Some(text.to_string()),
            "Description" if in_path(&path, "ResourceHeader") =>
              description = Some(text.to_string()),
            "DOI" => doi = Some(text.to_string()),
            "PriorID" => prior_ids.push(text.to_string()),
            "ReleaseDate" => release_date = Some(text.to_string()),
            "StartDate" if in_path(&path, "TimeSpan") =>
              time_span.start_date = Some(text.to_string()),
            "StopDate" if in_path(&path, "TimeSpan") =>
              time_span.stop_date = Some(text.to_string()),
            "Cadence" if in_path(&path, "TemporalDescription") =>
              time_span.cadence = Some(text.to_string()),
            "ObservedRegion" => observed_regions.push(text.to_string()),
            "Keyword" => keywords.push(text.to_string()),
            "MeasurementType" => measurement_types.push(text.to_string()),
            "InstrumentID" if path.len() == 3 => instrument_ids.push(text.to_string()),
            "ORCIdentifier" => person.orcid = Some(text.to_string()),
            "OrganizationName" => person.affiliation = Some(text.to_string()),
            "RORIdentifier" => person.ror = Some(text.to_string()),
            _ => (),
          }
        },

        Ok(Event::End(_)) => {
          let Some(closed) = path.pop() else { continue };
          match closed.as_str() {
            "Contact" =>
              if let Some(contact) = cur_contact.take() {
                if !contact.person_id.is_empty() {
                  merge_contact(&mut contacts, contact);
                }
              },
            "PublicationInfo" => publication = cur_pubinfo.take(),
            "AccessURL" =>
              if let Some(access_url) = cur_access_url.take() {
                if !access_url.url.is_empty() {
                  if let Some(acc) = cur_access.as_mut() {
                    acc.urls.push(access_url);
                  }
                }
              },
            "Rights" =>
              if let Some(mut rights) = cur_rights.take() {
                rights.text = rights.text.trim().to_string();
                if let Some(acc) = cur_access.as_mut() {
                  acc.rights.push(rights);
                }
              },
            "AccessInformation" =>
              if let Some(acc) = cur_access.take() {
                access.push(acc);
              },
            "InformationURL" =>
              if let Some(info) = cur_info_url.take() {
                if !info.url.is_empty() {
                  information_urls.push(info);
                }
              },
            "Funding" =>
              if let Some(fund) = cur_funding.take() {
                funding.push(fund);
              },
            "Parameter" =>
              if let Some(param) = cur_param.take() {
                parameters.push(param);
              },
            "Association" =>
              if !cur_assoc_id.is_empty() {
                associations.push(Association {
                  resource_id: std::mem::take(&mut cur_assoc_id),
                  kind:        AssociationKind::from(cur_assoc_kind.as_str()),
                });
              },
            _ => (),
          }
        },

        Ok(Event::Eof) => break,
        Ok(_) => (),
        Err(e) =>
          return Err(SpaseciteError::InvalidResource(format!("XML parse error: {e}"))),
      }
    }

    let Some(kind) = kind else {
      return Err(SpaseciteError::InvalidResource(
        "no resource description element (NumericalData, DisplayData, Observatory, Instrument, \
         Collection, Person) found"
          .to_string(),
      ));
    };
    if resource_id.is_empty() {
      return Err(SpaseciteError::MissingField("ResourceID".to_string()));
    }

    Ok(Self {
      kind,
      schema_version,
      metadata_rights,
      resource_id,
      name,
      alternate_name,
      description,
      doi,
      prior_ids,
      release_date,
      revision_dates,
      information_urls,
      contacts,
      publication,
      funding,
      access,
      time_span,
      observed_regions,
      keywords,
      measurement_types,
      instrument_ids,
      associations,
      parameters,
      person: (kind == ResourceKind::Person).then_some(person),
    })
  }

  /// Reads a SPASE record from a local XML file.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::InvalidResource`] for non-`.xml` paths, plus
  /// everything [`Self::from_xml_str`] can return.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if path.extension().map_or(true, |ext| ext != "xml") {
      return Err(SpaseciteError::InvalidResource(format!(
        "{} must be an XML file",
        path.display()
      )));
    }
    let content = std::fs::read_to_string(path)?;
    Self::from_xml_str(&content)
  }

  /// Fetches a SPASE record over HTTP.
  ///
  /// # Errors
  ///
  /// Returns [`SpaseciteError::Network`] for transport or HTTP-status
  /// failures, plus everything [`Self::from_xml_str`] can return.
  pub async fn fetch(url: &str) -> Result<Self> {
    debug!("Fetching SPASE record from: {url}");
    let response = reqwest::get(url).await?.error_for_status()?;
    let body = response.text().await?;
    trace!("SPASE response: {body}");
    Self::from_xml_str(&body)
  }

  /// The spase-metadata.org landing page for this record.
  pub fn landing_page(&self) -> String { landing_page_url(&self.resource_id) }

  /// The resolvable URL for this record: the registered DOI when one exists,
  /// otherwise the landing page.
  pub fn preferred_url(&self) -> String {
    self.doi.clone().unwrap_or_else(|| self.landing_page())
  }
}

/// Converts a `spase://` resource ID into its spase-metadata.org landing page.
pub fn landing_page_url(resource_id: &str) -> String {
  resource_id.trim().replacen("spase://", LANDING_PAGE_BASE, 1)
}

/// Splits a SPASE person ID into full, given, and family name strings.
///
/// Person IDs encode names as dot-separated segments after `Person/`, e.g.
/// `spase://SMWG/Person/Jane.E.Doe` becomes `("Jane E. Doe", "Jane E.",
/// "Doe")`. Multi-letter middle segments are reduced to initials. IDs without
/// dots are treated as organization names and returned with empty given and
/// family parts.
pub fn split_person_name(person_id: &str) -> (String, String, String) {
  let raw = match person_id.rsplit_once("Person/") {
    Some((_, tail)) => tail,
    None => person_id,
  };
  let raw = raw.replace(['\'', '"'], "");

  let Some((first, rest)) = raw.split_once('.') else {
    return (raw.clone(), String::new(), String::new());
  };
  let mut given = first.to_string();
  let mut family = rest.to_string();
  while let Some((initial, rest)) = family.split_once('.') {
    let initial = initial.chars().next().map(String::from).unwrap_or_default();
    given = format!("{given} {initial}.");
    family = rest.to_string();
  }
  (format!("{given} {family}"), given, family)
}

/// Parses the datetime formats found in SPASE records.
///
/// Accepts ISO 8601 with or without a trailing `Z` or fractional seconds,
/// and bare dates (`RevisionHistory` entries frequently omit the time).
pub fn parse_spase_datetime(raw: &str) -> Option<NaiveDateTime> {
  let s = raw.trim().trim_end_matches('Z');
  let s = s.split('.').next().unwrap_or(s);
  NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
    .ok()
    .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Resolves `PersonID` references against a local SPASE archive checkout.
///
/// The archive lays out records so that `spase://SMWG/Person/Jane.E.Doe`
/// lives at `<root>/SMWG/Person/Jane.E.Doe.xml`. Resolution failures are
/// logged and swallowed: a missing person record degrades the mapped output
/// (no ORCID, no affiliation) rather than failing the conversion.
#[derive(Debug, Clone)]
pub struct PersonDirectory {
  /// Root of the local SPASE checkout.
  root: PathBuf,
}

impl PersonDirectory {
  /// Creates a directory resolver rooted at the given path.
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  /// Looks up the identity details behind a person ID.
  pub fn resolve(&self, person_id: &str) -> Option<PersonDetails> {
    let relative = person_id.trim().replacen("spase://", "", 1).replace('\'', "");
    let path = self.root.join(format!("{relative}.xml"));
    if !path.is_file() {
      debug!("No local record for {person_id} at {}", path.display());
      return None;
    }
    match SpaseResource::from_file(&path) {
      Ok(resource) => resource.person,
      Err(e) => {
        warn!("Could not read person record {}: {e}", path.display());
        None
      },
    }
  }
}

/// Element names arrive namespace-qualified when the record uses a prefix;
/// comparisons are done on the local part only.
fn local_name(qualified: &[u8]) -> String {
  let s = String::from_utf8_lossy(qualified);
  match s.rsplit_once(':') {
    Some((_, local)) => local.to_string(),
    None => s.into_owned(),
  }
}

/// Whether the current element path passes through `needle`.
fn in_path(path: &[String], needle: &str) -> bool { path.iter().any(|p| p == needle) }

/// Merges a newly closed contact into the list, combining roles for repeated
/// person IDs.
fn merge_contact(contacts: &mut Vec<Contact>, contact: Contact) {
  if let Some(existing) = contacts.iter_mut().find(|c| c.person_id == contact.person_id) {
    for role in contact.roles {
      if !existing.roles.contains(&role) {
        existing.roles.push(role);
      }
    }
  } else {
    contacts.push(contact);
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Spase xmlns="http://www.spase-group.org/data/schema"
       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
       xsi:rights="Creative Commons Zero v1.0 Universal">
  <Version>2.6.1</Version>
  <NumericalData>
    <ResourceID>spase://NASA/NumericalData/ACE/MAG/L2/PT16S</ResourceID>
    <ResourceHeader>
      <ResourceName>ACE Magnetic Field 16-Second Level 2 Data</ResourceName>
      <AlternateName>ACE MAG L2</AlternateName>
      <DOI>https://doi.org/10.48322/example</DOI>
      <ReleaseDate>2023-05-04T12:34:56Z</ReleaseDate>
      <RevisionHistory>
        <RevisionEvent>
          <ReleaseDate>2021-04-27T15:38:11</ReleaseDate>
          <Note>Initial release</Note>
        </RevisionEvent>
        <RevisionEvent>
          <ReleaseDate>2023-05-04T12:34:56</ReleaseDate>
          <Note>Metadata update</Note>
        </RevisionEvent>
      </RevisionHistory>
      <Description>Magnetic field vectors at 16 second resolution.</Description>
      <Contact>
        <PersonID>spase://SMWG/Person/Charles.W.Smith</PersonID>
        <Role>PrincipalInvestigator</Role>
      </Contact>
      <Contact>
        <PersonID>spase://SMWG/Person/Jane.E.Doe</PersonID>
        <Role>MetadataContact</Role>
        <Role>TechnicalContact</Role>
      </Contact>
      <InformationURL>
        <Name>ACE Science Center</Name>
        <URL>https://izw1.caltech.edu/ACE/ASC/</URL>
        <Description>Mission documentation.</Description>
      </InformationURL>
      <PublicationInfo>
        <Authors>Smith, Charles W.; Doe, Jane E.</Authors>
        <PublicationDate>2022-01-01T00:00:00Z</PublicationDate>
        <PublishedBy>Space Physics Data Facility</PublishedBy>
      </PublicationInfo>
      <Funding>
        <Agency>NASA</Agency>
        <Project>ACE</Project>
        <AwardNumber>NNX00AA00G</AwardNumber>
      </Funding>
    </ResourceHeader>
    <AccessInformation>
      <RepositoryID>spase://SMWG/Repository/NASA/GSFC/SPDF</RepositoryID>
      <AccessRights>Open</AccessRights>
      <AccessURL>
        <Name>CDAWeb</Name>
        <URL>https://cdaweb.gsfc.nasa.gov/</URL>
        <ProductKey>AC_H2_MFI</ProductKey>
      </AccessURL>
      <RightsList>
        <Rights xml:lang="en"
                schemeURI="https://spdx.org/licenses/"
                rightsIdentifierScheme="SPDX"
                rightsIdentifier="CC0-1.0"
                rightsURI="https://spdx.org/licenses/CC0-1.0.html">
          Creative Commons Zero v1.0 Universal</Rights>
      </RightsList>
      <Format>CDF</Format>
    </AccessInformation>
    <InstrumentID>spase://SMWG/Instrument/ACE/MAG</InstrumentID>
    <MeasurementType>MagneticField</MeasurementType>
    <TemporalDescription>
      <TimeSpan>
        <StartDate>1997-09-02T00:00:12</StartDate>
        <StopDate>2023-04-01T00:00:00</StopDate>
      </TimeSpan>
      <Cadence>PT16S</Cadence>
    </TemporalDescription>
    <ObservedRegion>Heliosphere.NearEarth</ObservedRegion>
    <ObservedRegion>Earth.NearSurface</ObservedRegion>
    <Keyword>solar wind</Keyword>
    <Association>
      <AssociationID>spase://NASA/NumericalData/ACE/MAG/L2/PT1H</AssociationID>
      <AssociationType>PartOf</AssociationType>
    </Association>
    <Parameter>
      <Name>B-field magnitude</Name>
      <Description>Average magnitude of the magnetic field.
Further detail that should not be captured.</Description>
      <Units>nT</Units>
    </Parameter>
  </NumericalData>
</Spase>"#;

  #[test]
  fn parses_sample_record() {
    let resource = SpaseResource::from_xml_str(SAMPLE).unwrap();
    assert_eq!(resource.kind, ResourceKind::NumericalData);
    assert_eq!(resource.schema_version.as_deref(), Some("2.6.1"));
    assert_eq!(resource.resource_id, "spase://NASA/NumericalData/ACE/MAG/L2/PT16S");
    assert_eq!(resource.name.as_deref(), Some("ACE Magnetic Field 16-Second Level 2 Data"));
    assert_eq!(resource.doi.as_deref(), Some("https://doi.org/10.48322/example"));
    assert_eq!(resource.metadata_rights.as_deref(), Some("Creative Commons Zero v1.0 Universal"));
    assert_eq!(resource.release_date.as_deref(), Some("2023-05-04T12:34:56Z"));
    assert_eq!(resource.revision_dates.len(), 2);
    assert_eq!(resource.observed_regions, vec!["Heliosphere.NearEarth", "Earth.NearSurface"]);
    assert_eq!(resource.keywords, vec!["solar wind"]);
    assert_eq!(resource.measurement_types, vec!["MagneticField"]);
    assert_eq!(resource.instrument_ids, vec!["spase://SMWG/Instrument/ACE/MAG"]);
  }

  #[test]
  fn parses_contacts_and_publication() {
    let resource = SpaseResource::from_xml_str(SAMPLE).unwrap();
    assert_eq!(resource.contacts.len(), 2);
    assert_eq!(resource.contacts[0].person_id, "spase://SMWG/Person/Charles.W.Smith");
    assert_eq!(resource.contacts[0].roles, vec!["PrincipalInvestigator"]);
    assert_eq!(resource.contacts[1].roles, vec!["MetadataContact", "TechnicalContact"]);

    let publication = resource.publication.unwrap();
    assert_eq!(publication.authors.as_deref(), Some("Smith, Charles W.; Doe, Jane E."));
    assert_eq!(publication.published_by.as_deref(), Some("Space Physics Data Facility"));
  }

  #[test]
  fn contacts_sharing_a_person_id_merge_roles() {
    let resource = SpaseResource::from_xml_str(
      r#"<Spase xmlns="http://www.spase-group.org/data/schema">
        <NumericalData>
          <ResourceID>spase://NASA/NumericalData/Example</ResourceID>
          <ResourceHeader>
            <Contact>
              <PersonID>spase://SMWG/Person/Jane.E.Doe</PersonID>
              <Role>MetadataContact</Role>
            </Contact>
            <Contact>
              <PersonID>spase://SMWG/Person/Jane.E.Doe</PersonID>
              <Role>TechnicalContact</Role>
              <Role>MetadataContact</Role>
            </Contact>
          </ResourceHeader>
        </NumericalData>
      </Spase>"#,
    )
    .unwrap();

    // One entry for the person, roles combined without duplicates.
    assert_eq!(resource.contacts.len(), 1);
    assert_eq!(resource.contacts[0].person_id, "spase://SMWG/Person/Jane.E.Doe");
    assert_eq!(resource.contacts[0].roles, vec!["MetadataContact", "TechnicalContact"]);
  }

  #[test]
  fn parses_access_information() {
    let resource = SpaseResource::from_xml_str(SAMPLE).unwrap();
    assert_eq!(resource.access.len(), 1);
    let acc = &resource.access[0];
    assert_eq!(acc.repository_id.as_deref(), Some("spase://SMWG/Repository/NASA/GSFC/SPDF"));
    assert_eq!(acc.formats, vec!["CDF"]);
    assert_eq!(acc.urls.len(), 1);
    assert_eq!(acc.urls[0].product_keys, vec!["AC_H2_MFI"]);
    assert_eq!(acc.rights.len(), 1);
    assert_eq!(acc.rights[0].rights_identifier.as_deref(), Some("CC0-1.0"));
    assert_eq!(acc.rights[0].text, "Creative Commons Zero v1.0 Universal");
  }

  #[test]
  fn parameter_description_keeps_first_line_only() {
    let resource = SpaseResource::from_xml_str(SAMPLE).unwrap();
    assert_eq!(resource.parameters.len(), 1);
    assert_eq!(
      resource.parameters[0].description.as_deref(),
      Some("Average magnitude of the magnetic field.")
    );
  }

  #[test]
  fn rejects_record_without_description_element() {
    let err = SpaseResource::from_xml_str(
      r#"<Spase xmlns="http://www.spase-group.org/data/schema"><Version>2.6.1</Version></Spase>"#,
    )
    .unwrap_err();
    assert!(matches!(err, SpaseciteError::InvalidResource(_)));
  }

  #[test]
  fn rejects_record_without_resource_id() {
    let err = SpaseResource::from_xml_str(
      r#"<Spase><NumericalData><ResourceHeader></ResourceHeader></NumericalData></Spase>"#,
    )
    .unwrap_err();
    assert!(matches!(err, SpaseciteError::MissingField(field) if field == "ResourceID"));
  }

  #[test]
  fn landing_page_replaces_scheme() {
    assert_eq!(
      landing_page_url("spase://NASA/NumericalData/ACE/MAG/L2/PT16S"),
      "https://spase-metadata.org/NASA/NumericalData/ACE/MAG/L2/PT16S"
    );
  }

  #[test]
  fn splits_person_names() {
    let (full, given, family) = split_person_name("spase://SMWG/Person/Jane.E.Doe");
    assert_eq!(full, "Jane E. Doe");
    assert_eq!(given, "Jane E.");
    assert_eq!(family, "Doe");

    let (full, given, family) = split_person_name("spase://SMWG/Person/Charles.William.Smith");
    assert_eq!(full, "Charles W. Smith");
    assert_eq!(given, "Charles W.");
    assert_eq!(family, "Smith");

    let (full, given, family) = split_person_name("ACE Science Center");
    assert_eq!(full, "ACE Science Center");
    assert!(given.is_empty());
    assert!(family.is_empty());
  }

  #[test]
  fn person_directory_resolves_local_records() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let person_dir = dir.path().join("SMWG/Person");
    std::fs::create_dir_all(&person_dir)?;
    std::fs::write(
      person_dir.join("Jane.E.Doe.xml"),
      r#"<Spase xmlns="http://www.spase-group.org/data/schema">
        <Person>
          <ResourceID>spase://SMWG/Person/Jane.E.Doe</ResourceID>
          <ReleaseDate>2021-04-27T15:38:11Z</ReleaseDate>
          <ORCIdentifier>0000-0002-1825-0097</ORCIdentifier>
          <OrganizationName>University of New Hampshire</OrganizationName>
          <RORIdentifier>01rmh9n78</RORIdentifier>
        </Person>
      </Spase>"#,
    )?;

    let directory = PersonDirectory::new(dir.path());
    let details = directory.resolve("spase://SMWG/Person/Jane.E.Doe").unwrap();
    assert_eq!(details.orcid.as_deref(), Some("0000-0002-1825-0097"));
    assert_eq!(details.affiliation.as_deref(), Some("University of New Hampshire"));
    assert_eq!(details.ror.as_deref(), Some("01rmh9n78"));
    Ok(())
  }

  #[test]
  fn person_directory_swallows_missing_records() {
    let dir = tempdir().unwrap();
    let directory = PersonDirectory::new(dir.path());
    assert!(directory.resolve("spase://SMWG/Person/No.One.Here").is_none());
  }

  #[tokio::test]
  async fn fetch_rejects_invalid_urls() {
    assert!(matches!(
      SpaseResource::fetch("not a url").await,
      Err(SpaseciteError::Network(_))
    ));
  }

  #[test]
  fn parses_spase_datetimes() {
    assert!(parse_spase_datetime("2023-05-04T12:34:56Z").is_some());
    assert!(parse_spase_datetime("2023-05-04T12:34:56.789").is_some());
    assert!(parse_spase_datetime("2023-05-04").is_some());
    assert!(parse_spase_datetime("May 2023").is_none());
  }
}

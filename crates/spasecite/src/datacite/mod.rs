//! DataCite record model, field mapper, and REST client.
//!
//! The types here mirror DataCite's JSON:API payload for the `/dois`
//! endpoint: a [`DataCiteRecord`] wraps a `data` object of type `"dois"`
//! whose [`DoiAttributes`] carry the metadata proper.
//!
//! Serialization is deterministic. Field order is fixed by struct order,
//! optional fields and empty collections are skipped, and no map types
//! appear anywhere, so serializing the same record twice yields the same
//! bytes. Converted archives can therefore be regenerated and diffed.
//!
//! - [`map`]: the SPASE → DataCite field mapping
//! - [`client`]: the REST client for registering records

use super::*;

pub mod client;
pub mod map;

/// A complete DataCite JSON:API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCiteRecord {
  /// The JSON:API `data` object.
  pub data: DoiData,
}

impl DataCiteRecord {
  /// Wraps attributes in the JSON:API envelope.
  pub fn new(attributes: DoiAttributes) -> Self {
    Self { data: DoiData { kind: "dois".to_string(), id: None, attributes } }
  }

  /// Pretty-prints the record with a trailing newline, the on-disk format
  /// used by [`store`](crate::store).
  pub fn to_json_pretty(&self) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(self)?))
  }

  /// The DOI carried by this record, if one has been assigned.
  pub fn doi(&self) -> Option<&str> {
    self.data.attributes.doi.as_deref().or(self.data.id.as_deref())
  }
}

/// The JSON:API `data` object for a DOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoiData {
  /// Always `"dois"`.
  #[serde(rename = "type")]
  pub kind:       String,
  /// The DOI itself, set by DataCite in responses.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:         Option<String>,
  /// The metadata attributes.
  pub attributes: DoiAttributes,
}

/// DOI metadata attributes, camelCase on the wire.
///
/// Struct order matches the DataCite schema's documentation order and fixes
/// the serialized field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoiAttributes {
  /// Full DOI, e.g. `10.48322/xxxx-yyyy`. Omitted when DataCite should
  /// auto-assign a suffix under [`prefix`](Self::prefix).
  #[serde(skip_serializing_if = "Option::is_none")]
  pub doi:                   Option<String>,
  /// Registration prefix for auto-assigned suffixes.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prefix:                Option<String>,
  /// State transition to request alongside the metadata.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub event:                 Option<DoiEvent>,
  /// Landing page the DOI resolves to.
  pub url:                   String,
  /// Main researchers or organizations involved in producing the data.
  pub creators:              Vec<Creator>,
  /// Names or titles by which the resource is known.
  pub titles:                Vec<Title>,
  /// The name (and identifiers) of the entity that publishes the resource.
  pub publisher:             Publisher,
  /// Year of publication.
  pub publication_year:      i32,
  /// Resource type classification.
  pub types:                 ResourceTypes,
  /// Subjects, keywords, and classification codes.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub subjects:              Vec<Subject>,
  /// Institutions or persons who contributed to the resource.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub contributors:          Vec<Contributor>,
  /// Dates relevant to the resource.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dates:                 Vec<DataCiteDate>,
  /// Identifiers other than the DOI, e.g. the SPASE resource ID.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub alternate_identifiers: Vec<AlternateIdentifier>,
  /// Identifiers of related resources.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub related_identifiers:   Vec<RelatedIdentifier>,
  /// Technical formats of the data, e.g. `CDF`.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub formats:               Vec<String>,
  /// License and rights information.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub rights_list:           Vec<RightsEntry>,
  /// Abstracts and other descriptive text.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub descriptions:          Vec<Description>,
  /// Named locations the data pertains to.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub geo_locations:         Vec<GeoLocation>,
  /// Funding that produced the resource.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub funding_references:    Vec<FundingReference>,
  /// Metadata schema version, e.g. the SPASE schema version of the source.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub schema_version:        Option<String>,
}

/// DOI state transitions accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoiEvent {
  /// Move a draft to registered (resolvable metadata, hidden from search).
  Register,
  /// Move a draft or registered DOI to findable.
  Publish,
  /// Move a findable DOI back to registered.
  Hide,
}

impl Display for DoiEvent {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Register => write!(f, "register"),
      Self::Publish => write!(f, "publish"),
      Self::Hide => write!(f, "hide"),
    }
  }
}

/// Whether a name denotes a person or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameType {
  /// An individual, with given and family name parts when known.
  Personal,
  /// An organization, kept as a single name.
  Organizational,
}

/// A creator of the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
  /// Display name, `Family, Given` for persons.
  pub name:             String,
  #[serde(skip_serializing_if = "Option::is_none")]
  /// Person or organization.
  pub name_type:        Option<NameType>,
  /// Given name part.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub given_name:       Option<String>,
  /// Family name part.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub family_name:      Option<String>,
  /// ORCID or other identifiers.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub name_identifiers: Vec<NameIdentifier>,
  /// Affiliations, with ROR identifiers when known.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub affiliation:      Vec<Affiliation>,
}

/// A contributor: a creator plus the kind of contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
  /// DataCite contributorType controlled-vocabulary value.
  pub contributor_type: ContributorType,
  /// Display name, `Family, Given` for persons.
  pub name:             String,
  /// Person or organization.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name_type:        Option<NameType>,
  /// Given name part.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub given_name:       Option<String>,
  /// Family name part.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub family_name:      Option<String>,
  /// ORCID or other identifiers.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub name_identifiers: Vec<NameIdentifier>,
  /// Affiliations, with ROR identifiers when known.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub affiliation:      Vec<Affiliation>,
}

/// The subset of DataCite's contributorType vocabulary that SPASE contact
/// roles translate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributorType {
  /// Point of contact for the resource.
  ContactPerson,
  /// Person or institution responsible for gathering the data.
  DataCollector,
  /// Person curating the archived data.
  DataCurator,
  /// Institution hosting the data.
  HostingInstitution,
  /// Scientific leader of the producing project.
  ProjectLeader,
  /// Managerial leader of the producing project.
  ProjectManager,
  /// Other member of the producing project.
  ProjectMember,
}

impl Display for ContributorType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::ContactPerson => "ContactPerson",
      Self::DataCollector => "DataCollector",
      Self::DataCurator => "DataCurator",
      Self::HostingInstitution => "HostingInstitution",
      Self::ProjectLeader => "ProjectLeader",
      Self::ProjectManager => "ProjectManager",
      Self::ProjectMember => "ProjectMember",
    };
    write!(f, "{s}")
  }
}

/// An identifier attached to a name, e.g. an ORCID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameIdentifier {
  /// The identifier itself, as a URL.
  pub name_identifier:        String,
  /// Scheme name, e.g. `ORCID`.
  pub name_identifier_scheme: String,
  /// Scheme base URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scheme_uri:             Option<String>,
}

impl NameIdentifier {
  /// Builds an ORCID name identifier from a bare ORCID.
  pub fn orcid(id: &str) -> Self {
    let id = id.trim().trim_start_matches("https://orcid.org/");
    Self {
      name_identifier:        format!("https://orcid.org/{id}"),
      name_identifier_scheme: "ORCID".to_string(),
      scheme_uri:             Some("https://orcid.org".to_string()),
    }
  }
}

/// An affiliation, optionally qualified with a ROR identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliation {
  /// Organization name.
  pub name:                          String,
  /// Organization identifier, as a URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub affiliation_identifier:        Option<String>,
  /// Scheme name, e.g. `ROR`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub affiliation_identifier_scheme: Option<String>,
  /// Scheme base URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scheme_uri:                    Option<String>,
}

impl Affiliation {
  /// An affiliation known only by name.
  pub fn named(name: &str) -> Self {
    Self {
      name:                          name.to_string(),
      affiliation_identifier:        None,
      affiliation_identifier_scheme: None,
      scheme_uri:                    None,
    }
  }

  /// An affiliation with a ROR identifier (bare or full URL).
  pub fn with_ror(name: &str, ror: &str) -> Self {
    let ror = ror.trim().trim_start_matches("https://ror.org/");
    Self {
      name:                          name.to_string(),
      affiliation_identifier:        Some(format!("https://ror.org/{ror}")),
      affiliation_identifier_scheme: Some("ROR".to_string()),
      scheme_uri:                    Some("https://ror.org".to_string()),
    }
  }
}

/// A title entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
  /// The title text.
  pub title:      String,
  /// Title qualifier, e.g. `AlternativeTitle`; absent for the main title.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title_type: Option<String>,
}

/// The publishing entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
  /// Publisher name.
  pub name:                        String,
  /// Publisher identifier, as a URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub publisher_identifier:        Option<String>,
  /// Scheme name, e.g. `ROR`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub publisher_identifier_scheme: Option<String>,
  /// Scheme base URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scheme_uri:                  Option<String>,
}

/// Resource type classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypes {
  /// Free-text refinement, here the SPASE resource kind.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resource_type:         Option<String>,
  /// DataCite general type, `Dataset` or `Collection`.
  pub resource_type_general: String,
}

/// A subject entry, optionally under a named scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
  /// Subject text.
  pub subject:        String,
  /// Scheme the subject belongs to, e.g. `SPASE Region`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject_scheme: Option<String>,
}

/// A date entry with its DataCite dateType.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteDate {
  /// ISO 8601 date, datetime, or range.
  pub date:             String,
  /// One of DataCite's dateType values, e.g. `Issued`, `Updated`.
  pub date_type:        String,
  /// Free-text qualifier.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date_information: Option<String>,
}

/// A non-DOI identifier of this resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternateIdentifier {
  /// The identifier itself.
  pub alternate_identifier:      String,
  /// Identifier type, e.g. `SPASE ResourceID`.
  pub alternate_identifier_type: String,
}

/// An identifier of a related resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedIdentifier {
  /// The identifier itself.
  pub related_identifier:      String,
  /// Identifier type, `DOI` or `URL` here.
  pub related_identifier_type: String,
  /// DataCite relationType value, e.g. `IsPartOf`.
  pub relation_type:           String,
}

/// A rights entry with SPDX-style attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RightsEntry {
  /// Human-readable license name.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rights:                   Option<String>,
  /// License page URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rights_uri:               Option<String>,
  /// License identifier, e.g. `CC0-1.0`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rights_identifier:        Option<String>,
  /// Identifier scheme, e.g. `SPDX`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rights_identifier_scheme: Option<String>,
  /// Scheme base URL.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scheme_uri:               Option<String>,
}

/// A description entry with its descriptionType.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
  /// The descriptive text.
  pub description:      String,
  /// One of DataCite's descriptionType values, e.g. `Abstract`.
  pub description_type: String,
}

/// A named location the data pertains to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
  /// Place name, e.g. `Heliosphere Near Earth`.
  pub geo_location_place: String,
}

/// Funding that produced the resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingReference {
  /// Funder name.
  pub funder_name:  String,
  /// Grant or award number.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub award_number: Option<String>,
  /// Funded project title.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub award_title:  Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn envelope_serializes_with_dois_type() {
    let record = DataCiteRecord::new(DoiAttributes {
      url: "https://spase-metadata.org/NASA/NumericalData/Example".to_string(),
      publication_year: 2023,
      ..Default::default()
    });
    let json: serde_json::Value =
      serde_json::from_str(&record.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["data"]["type"], "dois");
    assert_eq!(json["data"]["attributes"]["publicationYear"], 2023);
    // Empty collections must not appear in the payload.
    assert!(json["data"]["attributes"].get("subjects").is_none());
    assert!(json["data"]["attributes"].get("relatedIdentifiers").is_none());
  }

  #[test]
  fn events_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&DoiEvent::Publish).unwrap(), r#""publish""#);
    assert_eq!(serde_json::to_string(&DoiEvent::Hide).unwrap(), r#""hide""#);
  }

  #[test]
  fn orcid_identifier_normalizes_bare_ids() {
    let bare = NameIdentifier::orcid("0000-0002-1825-0097");
    let full = NameIdentifier::orcid("https://orcid.org/0000-0002-1825-0097");
    assert_eq!(bare, full);
    assert_eq!(bare.name_identifier, "https://orcid.org/0000-0002-1825-0097");
  }

  #[test]
  fn ror_affiliation_normalizes_bare_ids() {
    let aff = Affiliation::with_ror("Space Physics Data Facility", "00ryjtt64");
    assert_eq!(aff.affiliation_identifier.as_deref(), Some("https://ror.org/00ryjtt64"));
    assert_eq!(aff.affiliation_identifier_scheme.as_deref(), Some("ROR"));
  }
}

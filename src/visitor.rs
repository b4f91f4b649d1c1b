use jiff::{civil::Date, tz::TimeZone, Timestamp};
use log::warn;
use mongodb::bson::{self, Bson, Document};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::normalize::{combine_date_time, convert_date_to_iso};

/// A document from the `guests` collection, as written by the sign-in app.
/// Dates are `MM-DD-YYYY`, times are `HH:MM:SS AM|PM`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub visiting: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sign_in_time: Option<String>,
    /// Only present when the guest signed out on a later day.
    #[serde(default, deserialize_with = "lenient_text")]
    pub sign_out_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sign_out_time: Option<String>,
}

impl GuestDocument {
    /// Deserialize a raw document.  The `_id` becomes the `id` field, an
    /// ObjectId is rendered as hex.
    pub fn from_document(mut doc: Document) -> Result<GuestDocument, bson::de::Error> {
        let id = match doc.remove("_id") {
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            Some(Bson::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let mut guest: GuestDocument = bson::from_document(doc)?;
        if !id.is_empty() {
            guest.id = id;
        }
        Ok(guest)
    }
}

/// Text field that tolerates the sign-in app storing a number or boolean,
/// e.g. a phone number saved as an int.  Null reads as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientText)
}

struct LenientText;

impl<'de> de::Visitor<'de> for LenientText {
    type Value = Option<String>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientText)
    }
}

/// One row of the `signin_app_visitors` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorRow {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub visiting: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub visit_date: Option<Date>,
    pub signed_in_at: Option<Timestamp>,
    pub signed_out_at: Option<Timestamp>,
}

impl VisitorRow {
    pub const COLUMNS: [&'static str; 10] = [
        "id",
        "first_name",
        "last_name",
        "company",
        "visiting",
        "phone",
        "email",
        "visit_date",
        "signed_in_at",
        "signed_out_at",
    ];

    /// Reshape a guest document.  Dates or times that can't be normalized
    /// leave the column empty, the row is always produced.
    pub fn from_document(doc: &GuestDocument, tz: &TimeZone) -> VisitorRow {
        let visit_date = convert_date_to_iso(doc.date.as_deref()).ok();
        let signed_in_at =
            combine_date_time(doc.date.as_deref(), doc.sign_in_time.as_deref(), tz).ok();
        let sign_out_date = doc.sign_out_date.as_deref().or(doc.date.as_deref());
        let signed_out_at =
            combine_date_time(sign_out_date, doc.sign_out_time.as_deref(), tz).ok();

        for (column, is_empty) in [
            ("visit_date", visit_date.is_none()),
            ("signed_in_at", signed_in_at.is_none()),
            ("signed_out_at", signed_out_at.is_none()),
        ] {
            if is_empty {
                warn!("guest {}: leaving {} empty", doc.id, column);
            }
        }

        VisitorRow {
            id: doc.id.clone(),
            first_name: doc.first_name.clone(),
            last_name: doc.last_name.clone(),
            company: doc.company.clone(),
            visiting: doc.visiting.clone(),
            phone: doc.phone.clone(),
            email: doc.email.clone(),
            visit_date,
            signed_in_at,
            signed_out_at,
        }
    }
}

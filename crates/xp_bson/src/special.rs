use core::any::Any;
use core::fmt;

use bson::oid;
use xp_pack::de::{Decode, Decoder, Node};
use xp_pack::extend::Extend;
use xp_pack::ser::{Encode, Encoder, Writer};
use xp_pack::{Category, Error, Result, Typed};

const OID_KEY: &str = "$oid";
const DATE_KEY: &str = "$date";
const NUMBER_LONG_KEY: &str = "$numberLong";

// -----------------------------------------------------------------------------
// ObjectId

/// A BSON object id.
///
/// Native in BSON; every other format reads and writes `{"$oid": "<hex>"}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub oid::ObjectId);

impl ObjectId {
    /// A fresh id.
    #[inline]
    pub fn new() -> Self {
        Self(oid::ObjectId::new())
    }

    pub fn parse_str(hex: &str) -> Result<Self> {
        oid::ObjectId::parse_str(hex).map(Self).map_err(Error::custom)
    }

    #[inline]
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ObjectId {
    /// All zero bytes.
    #[inline]
    fn default() -> Self {
        Self(oid::ObjectId::from_bytes([0; 12]))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0.to_hex())
    }
}

impl Typed for ObjectId {
    const CATEGORY: Category = Category::Special;
}

impl Decode for ObjectId {
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, ext: &Extend) -> Result<bool> {
        if let Some(result) = de.decode_special(self as &mut dyn Any, ext) {
            return result;
        }
        if de.is_null() {
            return Ok(false);
        }
        let mut hex = String::new();
        if !de.decode_key(OID_KEY, &mut hex, Extend::DEFAULT)? {
            return Ok(false);
        }
        *self = Self::parse_str(&hex).map_err(|e| de.error(e))?;
        Ok(true)
    }
}

impl Encode for ObjectId {
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        if let Some(result) = en.encode_special(key, self as &dyn Any, ext) {
            return result;
        }
        en.encode_object(key, ext, |en| {
            en.write_str(Some(OID_KEY), &self.to_hex(), Extend::DEFAULT)?;
            Ok(())
        })
    }
}

// -----------------------------------------------------------------------------
// DateTime

/// A BSON UTC datetime with millisecond precision.
///
/// Native in BSON; every other format writes `{"$date": <millis>}` and also
/// reads `{"$date": "<rfc3339>"}` and `{"$date": {"$numberLong": "<millis>"}}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateTime(pub bson::DateTime);

impl DateTime {
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Self(bson::DateTime::from_millis(millis))
    }

    #[inline]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl Default for DateTime {
    /// The Unix epoch.
    #[inline]
    fn default() -> Self {
        Self::from_millis(0)
    }
}

impl Typed for DateTime {
    const CATEGORY: Category = Category::Special;
}

impl Decode for DateTime {
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, ext: &Extend) -> Result<bool> {
        use xp_pack::de::NodeKind;

        if let Some(result) = de.decode_special(self as &mut dyn Any, ext) {
            return result;
        }
        let Some(date) = de.find(DATE_KEY, Extend::DEFAULT)? else {
            return Ok(false);
        };
        let millis = match date.kind() {
            NodeKind::String => {
                let text = date.read_string()?;
                bson::DateTime::parse_rfc3339_str(&text)
                    .map_err(|e| date.error(Error::custom(e)))?
                    .timestamp_millis()
            }
            NodeKind::Object => {
                let mut text = String::new();
                date.decode_key(NUMBER_LONG_KEY, &mut text, Extend::DEFAULT)?;
                text.parse()
                    .map_err(|_| date.mismatch("$numberLong is not an integer"))?
            }
            _ => date.read_i64()?,
        };
        *self = Self::from_millis(millis);
        Ok(true)
    }
}

impl Encode for DateTime {
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        if let Some(result) = en.encode_special(key, self as &dyn Any, ext) {
            return result;
        }
        en.encode_object(key, ext, |en| {
            en.write_i64(Some(DATE_KEY), self.timestamp_millis(), Extend::DEFAULT)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use xp_pack::value::Value;
    use xp_pack::{from_value, to_value};

    use super::*;

    #[test]
    fn generic_forms() {
        let id = ObjectId::parse_str("65f1a2b3c4d5e6f708192a3b").unwrap();
        let value = to_value(&id).unwrap();
        assert_eq!(value["$oid"].as_str(), Some("65f1a2b3c4d5e6f708192a3b"));
        assert_eq!(from_value::<ObjectId>(&value).unwrap(), id);

        let date = DateTime::from_millis(1_700_000_000_123);
        let value = to_value(&date).unwrap();
        assert_eq!(value["$date"].as_i64(), Some(1_700_000_000_123));
        assert_eq!(from_value::<DateTime>(&value).unwrap(), date);
    }

    #[test]
    fn date_text_forms() {
        let object = |inner: Value| Value::Object(vec![("$date".into(), inner)]);

        let rfc = object(Value::String("1970-01-01T00:00:01Z".into()));
        assert_eq!(from_value::<DateTime>(&rfc).unwrap().timestamp_millis(), 1000);

        let long = object(Value::Object(vec![(
            "$numberLong".into(),
            Value::String("42".into()),
        )]));
        assert_eq!(from_value::<DateTime>(&long).unwrap().timestamp_millis(), 42);
    }
}

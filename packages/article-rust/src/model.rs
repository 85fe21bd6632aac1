//! Article records.
//!
//! Catalog attributes are schema-flexible: everything except `id` is carried
//! as an opaque JSON object and serialized flat next to the id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field-equality filter for listing articles. `id` matches the article id.
pub type ArticleFilter = Map<String, Value>;

/// A stored catalog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Article {
    /// Whether every filter entry equals the corresponding article field.
    #[must_use]
    pub fn matches(&self, filter: &ArticleFilter) -> bool {
        filter.iter().all(|(key, expected)| {
            if key == "id" {
                expected.as_str() == Some(self.id.as_str())
            } else {
                self.fields.get(key) == Some(expected)
            }
        })
    }
}

/// Request body of `POST /article/`: a JSON object with an optional `id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewArticle {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewArticle {
    /// Keeps a client-supplied id; a missing or blank one becomes a UUID v4.
    #[must_use]
    pub fn into_article(self) -> Article {
        let id = match self.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => uuid::Uuid::new_v4().to_string(),
        };
        Article {
            id,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flat() {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("Lamp"));
        fields.insert("price".to_string(), json!(19.5));
        let article = Article {
            id: "a-1".to_string(),
            fields,
        };

        assert_eq!(
            serde_json::to_value(&article).unwrap(),
            json!({ "id": "a-1", "name": "Lamp", "price": 19.5 })
        );
    }

    #[test]
    fn keeps_client_id() {
        let new: NewArticle = serde_json::from_value(json!({ "id": "sku-9", "name": "Chair" })).unwrap();
        let article = new.into_article();
        assert_eq!(article.id, "sku-9");
        assert_eq!(article.fields.get("name"), Some(&json!("Chair")));
        assert!(!article.fields.contains_key("id"));
    }

    #[test]
    fn blank_or_missing_id_gets_uuid() {
        for body in [json!({ "name": "Desk" }), json!({ "id": "  ", "name": "Desk" })] {
            let new: NewArticle = serde_json::from_value(body).unwrap();
            let article = new.into_article();
            assert!(uuid::Uuid::parse_str(&article.id).is_ok());
        }
    }

    #[test]
    fn non_string_id_is_rejected() {
        assert!(serde_json::from_value::<NewArticle>(json!({ "id": 42 })).is_err());
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(serde_json::from_value::<NewArticle>(json!(["a", "b"])).is_err());
        assert!(serde_json::from_value::<NewArticle>(json!("lamp")).is_err());
    }

    #[test]
    fn filter_matches_id_and_fields() {
        let article = Article {
            id: "a-1".to_string(),
            fields: json!({ "color": "red" }).as_object().cloned().unwrap(),
        };

        let by_id = json!({ "id": "a-1" }).as_object().cloned().unwrap();
        let by_color = json!({ "color": "red" }).as_object().cloned().unwrap();
        let mismatch = json!({ "color": "blue" }).as_object().cloned().unwrap();

        assert!(article.matches(&by_id));
        assert!(article.matches(&by_color));
        assert!(!article.matches(&mismatch));
        assert!(article.matches(&ArticleFilter::new()));
    }
}

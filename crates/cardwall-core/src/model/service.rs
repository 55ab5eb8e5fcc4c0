use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// A reference to a user. The backend sends either a bare id or a populated
/// user document; both collapse to this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRef")]
pub struct UserRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }

    /// Name when known, id otherwise.
    #[must_use]
    pub fn display(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRef {
    Id(String),
    Doc {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default, alias = "fullName")]
        name: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

impl From<RawRef> for UserRef {
    fn from(raw: RawRef) -> Self {
        match raw {
            RawRef::Id(id) => Self::new(id),
            RawRef::Doc { id, name, email } => Self { id, name, email },
        }
    }
}

/// A service and its membership, as owned by the remote system of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "serviceName")]
    pub name: String,
    #[serde(default)]
    pub chief: Option<UserRef>,
    #[serde(default)]
    pub project_manager: Option<UserRef>,
    #[serde(default)]
    pub assigned_resources: Vec<UserRef>,
    #[serde(default, alias = "backups")]
    pub backup: Vec<UserRef>,
    #[serde(default, deserialize_with = "deserialize_ref_id")]
    pub task_board: Option<String>,
}

impl Service {
    /// De-duplicated ids of everyone attached to the service in any role.
    #[must_use]
    pub fn member_ids(&self) -> BTreeSet<&str> {
        self.chief
            .iter()
            .chain(self.project_manager.iter())
            .chain(self.assigned_resources.iter())
            .chain(self.backup.iter())
            .map(|user| user.id.as_str())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

pub(crate) fn deserialize_user_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Option::<Vec<UserRef>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(refs.into_iter().map(|user| user.id).collect())
}

fn deserialize_ref_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<UserRef>::deserialize(deserializer)?.map(|r| r.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_ref_accepts_id_or_document() {
        let bare: UserRef = serde_json::from_str(r#""u1""#).unwrap();
        assert_eq!(bare, UserRef::new("u1"));

        let doc: UserRef =
            serde_json::from_str(r#"{"_id":"u2","fullName":"Grace","email":"g@x.io"}"#).unwrap();
        assert_eq!(doc.id, "u2");
        assert_eq!(doc.display(), "Grace");
    }

    #[test]
    fn service_deserializes_populated_membership() {
        let raw = r#"{
            "_id": "svc1",
            "serviceName": "Billing",
            "chief": {"_id": "c"},
            "projectManager": null,
            "assignedResources": ["r1", {"_id": "r2"}],
            "backup": [],
            "taskBoard": {"_id": "tb1", "cards": []}
        }"#;
        let service: Service = serde_json::from_str(raw).unwrap();
        assert_eq!(service.name, "Billing");
        assert!(service.project_manager.is_none());
        assert_eq!(service.assigned_resources.len(), 2);
        assert_eq!(service.task_board.as_deref(), Some("tb1"));
    }

    #[test]
    fn task_board_may_be_a_bare_id() {
        let service: Service = serde_json::from_str(r#"{"id":"s","taskBoard":"tb9"}"#).unwrap();
        assert_eq!(service.task_board.as_deref(), Some("tb9"));
    }

    #[test]
    fn member_ids_deduplicate_across_roles() {
        let service = Service {
            id: "s".into(),
            name: String::new(),
            chief: Some(UserRef::new("a")),
            project_manager: Some(UserRef::new("a")),
            assigned_resources: vec![UserRef::new("b"), UserRef::new("c")],
            backup: vec![UserRef::new("b"), UserRef::new("")],
            task_board: None,
        };
        let ids: Vec<_> = service.member_ids().into_iter().collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}

//! `cw whoami` — show who the configured token says you are.

use crate::output::{pretty_kv, render};
use crate::session::Session;
use cardwall_core::{Action, Identity, Roles, Tier};
use clap::Args;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Also resolve your roles on this service.
    #[arg(short, long)]
    pub service: Option<String>,
}

#[derive(Debug, Serialize)]
struct ServiceRoles {
    service_id: String,
    tier: Tier,
    roles: Roles,
    allowed: Vec<Action>,
}

#[derive(Debug, Serialize)]
struct Whoami {
    #[serde(flatten)]
    identity: Identity,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<ServiceRoles>,
}

pub fn run_whoami(args: &WhoamiArgs, session: &Session) -> anyhow::Result<()> {
    let identity = session.identity()?;

    let service = match &args.service {
        Some(service_id) => {
            let sync = session.open(service_id)?;
            let roles = *sync.roles();
            Some(ServiceRoles {
                service_id: service_id.clone(),
                tier: roles.tier(),
                roles,
                allowed: roles.allowed(),
            })
        }
        None => None,
    };

    render(session.output(), &Whoami { identity, service }, write_human)
}

fn write_human(who: &Whoami, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_kv(w, "User", &who.identity.user_id)?;
    let role = if who.identity.role.is_empty() {
        "(none)"
    } else {
        who.identity.role.as_str()
    };
    pretty_kv(w, "Role", role)?;

    if let Some(service) = &who.service {
        pretty_kv(w, "Service", &service.service_id)?;
        pretty_kv(w, "Tier", service.tier.to_string())?;
        let allowed: Vec<String> = service.allowed.iter().map(ToString::to_string).collect();
        let allowed = if allowed.is_empty() {
            "nothing".to_string()
        } else {
            allowed.join(", ")
        };
        pretty_kv(w, "May", allowed)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: WhoamiArgs,
    }

    #[test]
    fn service_is_optional() {
        let w = Wrapper::parse_from(["test"]);
        assert!(w.args.service.is_none());
        let w = Wrapper::parse_from(["test", "--service", "svc-1"]);
        assert_eq!(w.args.service.as_deref(), Some("svc-1"));
    }

    #[test]
    fn human_output_names_missing_role() {
        let who = Whoami {
            identity: Identity::new("u-1", ""),
            service: None,
        };
        let mut buf = Vec::new();
        write_human(&who, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("u-1"));
        assert!(text.contains("(none)"));
    }

    #[test]
    fn json_flattens_identity() {
        let who = Whoami {
            identity: Identity::new("u-1", "admin"),
            service: None,
        };
        let value = serde_json::to_value(&who).unwrap();
        assert_eq!(value, serde_json::json!({ "user_id": "u-1", "role": "admin" }));
    }
}

//! Seed command - sample org structure and a first admin account.
//!
//! Safe to run repeatedly: existing OUs, divisions and the admin are
//! looked up by name and reused.

use uuid::Uuid;

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::domain::{Division, MembershipChange, NewUser, OrgUnit, Password, User, UserRole};
use crate::errors::AppResult;
use crate::infra::{Database, OrgRepository, Persistence, UnitOfWork};

/// OU name and the single division seeded inside it
pub const SAMPLE_ORG: &[(&str, &str)] = &[
    ("News Management", "Finance"),
    ("Software Reviews", "IT"),
    ("Hardware Reviews", "Writing"),
    ("Opinion Publishing", "Development"),
];

/// Division the seeded admin is granted
pub const ADMIN_DIVISION: &str = "IT";

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config.database_url).await?;
    let uow = Persistence::new(db);

    let admin = seed(&uow, &args.admin_username, &args.admin_password).await?;
    tracing::info!(user_id = %admin.id, username = %admin.username, "Seed completed");
    Ok(())
}

/// Create the sample structure and admin through any unit of work.
pub async fn seed<U: UnitOfWork + ?Sized>(
    uow: &U,
    admin_username: &str,
    admin_password: &str,
) -> AppResult<User> {
    let org = uow.org();
    let mut admin_division = None;

    for (ou_name, division_name) in SAMPLE_ORG {
        let ou = ensure_ou(org.as_ref(), ou_name).await?;
        let division = ensure_division(org.as_ref(), division_name, ou.id).await?;
        if *division_name == ADMIN_DIVISION {
            admin_division = Some(division.id);
        }
    }

    let users = uow.users();
    let admin = match users.find_by_username(admin_username).await? {
        Some(existing) => {
            tracing::info!(username = %admin_username, "Admin already exists");
            users.update_role(existing.id, UserRole::Admin).await?.user
        }
        None => {
            let password_hash = Password::new(admin_password)?.into_string();
            let created = users
                .create(NewUser {
                    username: admin_username.to_string(),
                    password_hash,
                    role: UserRole::Admin,
                })
                .await?;
            tracing::info!(username = %admin_username, "Admin created");
            created
        }
    };

    match admin_division {
        Some(division_id) => Ok(users
            .apply_membership(admin.id, MembershipChange::Grant(vec![division_id]))
            .await?
            .user),
        None => Ok(admin),
    }
}

async fn ensure_ou(org: &dyn OrgRepository, name: &str) -> AppResult<OrgUnit> {
    if let Some(ou) = org.find_ou_by_name(name).await? {
        return Ok(ou);
    }
    let ou = org.create_ou(name.to_string()).await?;
    tracing::info!(ou_id = %ou.id, name = %ou.name, "OU created");
    Ok(ou)
}

async fn ensure_division(
    org: &dyn OrgRepository,
    name: &str,
    ou_id: Uuid,
) -> AppResult<Division> {
    if let Some(division) = org.find_division_by_name(name).await? {
        return Ok(division);
    }
    let division = org.create_division(name.to_string(), Some(ou_id)).await?;
    tracing::info!(division_id = %division.id, name = %division.name, "Division created");
    Ok(division)
}

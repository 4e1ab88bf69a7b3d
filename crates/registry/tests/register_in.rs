//! End-to-end coverage of scoped registration through the public API.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use strata_registry::{
	BaseChoice, Discriminator, Registries, RegistryToken, apply_bases, load_config_str,
	parse_config_str,
};

const CONFIG: &str = r#"
registry "custom"
register-in "custom" {
    utility "greeting" kind="text" value="scoped hello"
}
utility "greeting" kind="text" value="plain hello"
"#;

#[test]
fn scoped_and_unscoped_registrations_stay_apart() {
	let registries = Arc::new(Registries::new());
	load_config_str(&registries, CONFIG).expect("load should succeed");

	let custom = registries.resolve_path("custom").expect("defined by config");

	// The block's registration landed in `custom`, keyed by the plain
	// (kind, name) identity; only the pending action's discriminator was
	// scoped.
	assert_eq!(
		custom.utility_of::<String>("text", "greeting").expect("in custom").as_str(),
		"scoped hello"
	);
	assert_eq!(
		registries.base().utility_of::<String>("text", "greeting").expect("in base").as_str(),
		"plain hello"
	);
}

#[test]
fn pending_list_distinguishes_the_two_registrations() {
	let registries = Arc::new(Registries::new());
	let ctx = parse_config_str(&registries, CONFIG).expect("parse should succeed");

	let discriminators: Vec<_> = ctx
		.actions()
		.iter()
		.filter_map(|a| a.discriminator.clone())
		.collect();
	assert_eq!(discriminators.len(), 2);

	assert_eq!(
		discriminators[0],
		Discriminator::Utility {
			kind: "text".to_string(),
			name: "greeting".to_string(),
		}
		.scoped(RegistryToken::new(None, "custom"))
	);
	assert_eq!(
		discriminators[1],
		Discriminator::Utility {
			kind: "text".to_string(),
			name: "greeting".to_string(),
		}
	);

	// Both present at once: scoping is what keeps them from conflicting.
	ctx.execute().expect("no conflict between scoped and unscoped keys");
}

#[test]
fn saved_token_resolves_to_the_same_registry_after_editing_bases() {
	let registries = Arc::new(Registries::new());
	load_config_str(&registries, CONFIG).expect("load should succeed");

	let custom = registries.resolve_path("custom").expect("defined by config");
	let local = registries.define(Some("site"), "local").expect("define should succeed");

	// The browser form submits tokens; apply them as the new bases list.
	apply_bases(
		&registries,
		&local,
		&[BaseChoice::Registry(custom.token().clone()), BaseChoice::GlobalBase],
	)
	.expect("apply should succeed");

	// `local` now sees the scoped registration through its bases chain.
	assert_eq!(
		local.utility_of::<String>("text", "greeting").expect("via bases").as_str(),
		"scoped hello"
	);

	// A token persisted as JSON comes back as the identical live registry.
	let json = serde_json::to_string(custom.token()).expect("token should serialize");
	let token: RegistryToken = serde_json::from_str(&json).expect("token should deserialize");
	let resolved = registries.resolve(&token).expect("token should resolve");
	assert!(Arc::ptr_eq(&resolved, &custom));
}

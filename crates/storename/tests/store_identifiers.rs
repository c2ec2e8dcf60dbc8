//! End-to-end identifier generation at SQL Server's 128 character limit.

use storename::prelude::*;
use storename::{ResolvedEntity, SchemaErrorKind};

const LOGIN: &str = "LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorkingCorrectly";
const LOGIN_DETAILS: &str = "LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorkingCorrectlyDetails";
const EXTRA: &str = "ExtraPropertyWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorkingCorrectly";
const EXTRA_DETAILS: &str = "ExtraPropertyWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorkingCorrectlyDetails";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn login_model() -> ModelBuilder {
    ModelBuilder::new(ResolverConfig::default())
        .entity(
            EntityDecl::new(LOGIN)
                .column("Id")
                .column("ProfileId")
                .primary_key(["Id"])
                .foreign_key(ForeignKeyDecl::new(LOGIN_DETAILS, ["ProfileId"])),
        )
        .entity(
            EntityDecl::new(LOGIN_DETAILS)
                .column("Id")
                .column(EXTRA)
                .column(EXTRA_DETAILS)
                .primary_key(["Id"])
                .key_name("PK_LoginDetails")
                .index(IndexDecl::new([EXTRA])),
        )
}

fn entity<'m>(model: &'m ResolvedModel, name: &str) -> &'m ResolvedEntity {
    model.entity(name).unwrap()
}

#[test]
fn identifiers_are_generated_correctly() {
    init_tracing();
    let model = login_model().build().unwrap();

    let login = entity(&model, LOGIN);
    assert_eq!(
        login.table_name(),
        "LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorking~"
    );
    assert_eq!(
        login.primary_key().unwrap().name,
        "PK_LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWork~"
    );
    assert_eq!(login.foreign_keys().len(), 1);
    assert_eq!(
        login.foreign_keys()[0].name,
        "FK_LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWork~"
    );
    assert_eq!(login.indexes().len(), 1);
    assert_eq!(
        login.indexes()[0].name,
        "IX_LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWork~"
    );

    let details = entity(&model, LOGIN_DETAILS);
    assert_eq!(
        details.table_name(),
        "LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorkin~1"
    );
    assert_eq!(details.primary_key().unwrap().name, "PK_LoginDetails");
    assert_eq!(
        details.columns()[1].name,
        "ExtraPropertyWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorkingCo~"
    );
    assert_eq!(
        details.columns()[2].name,
        "ExtraPropertyWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWorkingC~1"
    );
    assert_eq!(details.indexes().len(), 1);
    assert_eq!(
        details.indexes()[0].name,
        "IX_LoginEntityTypeWithAnExtremelyLongAndOverlyConvolutedNameThatIsUsedToVerifyThatTheStoreIdentifierGenerationLengthLimitIsWor~1"
    );
}

#[test]
fn foreign_key_points_at_resolved_principal() {
    let model = login_model().build().unwrap();
    let fk = &entity(&model, LOGIN).foreign_keys()[0];
    assert_eq!(fk.principal, LOGIN_DETAILS);
    assert_eq!(fk.principal_table, entity(&model, LOGIN_DETAILS).table_name());
    assert_eq!(fk.columns, ["ProfileId"]);
    assert_eq!(fk.principal_columns, ["Id"]);
}

#[test]
fn every_identifier_fits_and_is_unique_per_namespace() {
    let model = login_model().build().unwrap();
    let names = model.names();

    for entry in names {
        assert!(entry.physical.chars().count() <= 128, "{}", entry.physical);
        assert_eq!(entry.truncated, entry.logical.chars().count() > 128);
        if !entry.truncated {
            assert_eq!(entry.physical, entry.logical);
        }
    }

    for namespace in [Namespace::Table, Namespace::Key, Namespace::ForeignKey, Namespace::Index] {
        let physical: Vec<_> = names.in_namespace(&namespace).map(|e| &e.physical).collect();
        let mut deduped = physical.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), physical.len(), "duplicates in {namespace}");
    }
}

#[test]
fn same_declarations_give_same_snapshot() {
    let first = login_model().build().unwrap();
    let second = login_model().build().unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.snapshot()).unwrap(),
        serde_json::to_string(&second.snapshot()).unwrap()
    );
}

#[test]
fn declaration_order_decides_who_keeps_the_plain_marker() {
    let model = ModelBuilder::new(ResolverConfig::default())
        .entity(EntityDecl::new(LOGIN_DETAILS).column("Id"))
        .entity(EntityDecl::new(LOGIN).column("Id"))
        .build()
        .unwrap();

    assert!(entity(&model, LOGIN_DETAILS).table_name().ends_with("Working~"));
    assert!(entity(&model, LOGIN).table_name().ends_with("Workin~1"));
}

#[test]
fn same_long_column_in_two_tables_is_not_disambiguated() {
    let model = ModelBuilder::new(ResolverConfig::default())
        .entity(EntityDecl::new("Accounts").column(EXTRA))
        .entity(EntityDecl::new("Profiles").column(EXTRA))
        .build()
        .unwrap();

    let accounts = entity(&model, "Accounts").column_name(EXTRA).unwrap();
    let profiles = entity(&model, "Profiles").column_name(EXTRA).unwrap();
    assert_eq!(accounts, profiles);
    assert!(accounts.ends_with("WorkingCo~"));
}

#[test]
fn short_table_name_taken_by_truncated_name_is_an_error() {
    let taken = format!("{}~", &LOGIN[..127]);
    let err = ModelBuilder::new(ResolverConfig::default())
        .entity(EntityDecl::new(LOGIN))
        .entity(EntityDecl::new("Shadow").table(taken.clone()))
        .build()
        .unwrap_err();

    match err {
        Error::NamespaceCollision(e) => {
            assert_eq!(e.namespace, Namespace::Table);
            assert_eq!(e.physical, taken);
            assert_eq!(e.existing_logical, LOGIN);
        }
        other => panic!("expected collision, got {other}"),
    }
}

#[test]
fn too_small_max_length_is_a_configuration_error() {
    let err = ModelBuilder::new(ResolverConfig::default().max_length(2))
        .entity(EntityDecl::new("Orders"))
        .build()
        .unwrap_err();
    assert!(err.is_config_error());
    assert_eq!(err.schema_kind(), None::<SchemaErrorKind>);
}

#[test]
fn resolver_can_be_used_without_entities() {
    let resolver = IdentifierResolver::default();
    let names = resolver
        .resolve([
            (Namespace::Index, format!("IX_{LOGIN}")),
            (Namespace::Index, format!("IX_{LOGIN_DETAILS}")),
        ])
        .unwrap();

    let physical: Vec<_> = names.iter().map(|e| e.physical.as_str()).collect();
    assert!(physical[0].ends_with("IsWork~"));
    assert!(physical[1].ends_with("IsWor~1"));
}

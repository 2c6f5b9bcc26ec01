//! Declared scope kinds.
//!
//! Constant schema descriptors for the top-level sections of a system
//! description. Scope names map to kinds through [`scope_element_type`];
//! sections with no declared kind decode through the generic detector and
//! still diff structurally.

use crate::schema::{
    AttributePolicy, AttributeSpec, CollectionSchema, CompareMode, ElementRule, ElementType,
    RecordSchema, RulePredicate,
};

const fn attr(name: &'static str) -> AttributeSpec {
    AttributeSpec {
        name,
        element_type: None,
    }
}

/// Generic package fallback for documents without a `package_system` tag.
pub static PACKAGE: RecordSchema = RecordSchema {
    kind: "package",
    attributes: AttributePolicy::Declared(&[attr("name"), attr("version")]),
    compare: CompareMode::Atomic,
};

pub static RPM_PACKAGE: RecordSchema = RecordSchema {
    kind: "rpm_package",
    attributes: AttributePolicy::Declared(&[
        attr("name"),
        attr("version"),
        attr("release"),
        attr("arch"),
        attr("vendor"),
        attr("checksum"),
    ]),
    compare: CompareMode::Atomic,
};

pub static DPKG_PACKAGE: RecordSchema = RecordSchema {
    kind: "dpkg_package",
    attributes: AttributePolicy::Declared(&[
        attr("name"),
        attr("version"),
        attr("arch"),
        attr("vendor"),
        attr("checksum"),
    ]),
    compare: CompareMode::Atomic,
};

/// The `packages` scope: element decoding is dispatched on the collection's
/// own `package_system` attribute.
pub static PACKAGES: CollectionSchema = CollectionSchema {
    kind: "packages",
    attributes: AttributePolicy::Declared(&[attr("package_system")]),
    element_rules: &[
        ElementRule {
            when: RulePredicate::AttributeEquals("package_system", "rpm"),
            element_type: ElementType::Record(&RPM_PACKAGE),
        },
        ElementRule {
            when: RulePredicate::AttributeEquals("package_system", "dpkg"),
            element_type: ElementType::Record(&DPKG_PACKAGE),
        },
        ElementRule {
            when: RulePredicate::Always,
            element_type: ElementType::Record(&PACKAGE),
        },
    ],
};

pub static USER: RecordSchema = RecordSchema {
    kind: "user",
    attributes: AttributePolicy::Declared(&[
        attr("name"),
        attr("password"),
        attr("encrypted_password"),
        attr("uid"),
        attr("gid"),
        attr("comment"),
        attr("home"),
        attr("shell"),
        attr("last_changed_date"),
    ]),
    compare: CompareMode::Atomic,
};

/// The `users` scope.
pub static USERS: CollectionSchema = CollectionSchema {
    kind: "users",
    attributes: AttributePolicy::Declared(&[]),
    element_rules: &[ElementRule {
        when: RulePredicate::Always,
        element_type: ElementType::Record(&USER),
    }],
};

pub static ZYPP_REPOSITORY: RecordSchema = RecordSchema {
    kind: "zypp_repository",
    attributes: AttributePolicy::Declared(&[
        attr("alias"),
        attr("name"),
        attr("type"),
        attr("url"),
        attr("enabled"),
        attr("autorefresh"),
        attr("gpgcheck"),
        attr("priority"),
    ]),
    compare: CompareMode::Atomic,
};

pub static YUM_REPOSITORY: RecordSchema = RecordSchema {
    kind: "yum_repository",
    attributes: AttributePolicy::Declared(&[
        attr("alias"),
        attr("name"),
        attr("type"),
        attr("url"),
        attr("enabled"),
        attr("gpgcheck"),
    ]),
    compare: CompareMode::Atomic,
};

pub static APT_REPOSITORY: RecordSchema = RecordSchema {
    kind: "apt_repository",
    attributes: AttributePolicy::Declared(&[
        attr("type"),
        attr("url"),
        attr("distribution"),
        attr("components"),
    ]),
    compare: CompareMode::Atomic,
};

/// The `repositories` scope: element decoding is dispatched on the
/// collection's own `repository_system` attribute. An unknown system falls
/// back to the generic detector.
pub static REPOSITORIES: CollectionSchema = CollectionSchema {
    kind: "repositories",
    attributes: AttributePolicy::Declared(&[attr("repository_system")]),
    element_rules: &[
        ElementRule {
            when: RulePredicate::AttributeEquals("repository_system", "zypp"),
            element_type: ElementType::Record(&ZYPP_REPOSITORY),
        },
        ElementRule {
            when: RulePredicate::AttributeEquals("repository_system", "yum"),
            element_type: ElementType::Record(&YUM_REPOSITORY),
        },
        ElementRule {
            when: RulePredicate::AttributeEquals("repository_system", "apt"),
            element_type: ElementType::Record(&APT_REPOSITORY),
        },
    ],
};

pub static SERVICE: RecordSchema = RecordSchema {
    kind: "service",
    attributes: AttributePolicy::Declared(&[attr("name"), attr("state")]),
    compare: CompareMode::Atomic,
};

/// The `services` scope: the `init_system` attribute says how the state
/// values are to be read, the element shape is the same either way.
pub static SERVICES: CollectionSchema = CollectionSchema {
    kind: "services",
    attributes: AttributePolicy::Declared(&[attr("init_system")]),
    element_rules: &[ElementRule {
        when: RulePredicate::Always,
        element_type: ElementType::Record(&SERVICE),
    }],
};

pub static GROUP: RecordSchema = RecordSchema {
    kind: "group",
    attributes: AttributePolicy::Declared(&[
        attr("name"),
        attr("password"),
        attr("gid"),
        attr("users"),
    ]),
    compare: CompareMode::Atomic,
};

/// The `groups` scope.
pub static GROUPS: CollectionSchema = CollectionSchema {
    kind: "groups",
    attributes: AttributePolicy::Declared(&[]),
    element_rules: &[ElementRule {
        when: RulePredicate::Always,
        element_type: ElementType::Record(&GROUP),
    }],
};

/// The `os` scope: a single atomic record.
pub static OS: RecordSchema = RecordSchema {
    kind: "os",
    attributes: AttributePolicy::Declared(&[attr("name"), attr("version"), attr("architecture")]),
    compare: CompareMode::Atomic,
};

pub static UNMANAGED_FILE: RecordSchema = RecordSchema {
    kind: "unmanaged_file",
    attributes: AttributePolicy::Declared(&[
        attr("name"),
        attr("type"),
        attr("user"),
        attr("group"),
        attr("size"),
        attr("mode"),
    ]),
    compare: CompareMode::Atomic,
};

pub static UNMANAGED_FILE_LIST: CollectionSchema = CollectionSchema {
    kind: "unmanaged_file_list",
    attributes: AttributePolicy::Declared(&[]),
    element_rules: &[ElementRule {
        when: RulePredicate::Always,
        element_type: ElementType::Record(&UNMANAGED_FILE),
    }],
};

/// The `unmanaged_files` scope: a composite file-scope record. The scalar
/// `extracted` flag and the `files` collection are diffed per attribute; any
/// attribute added to the kind later must also be taught to the comparison
/// lists or comparing raises a schema error.
pub static UNMANAGED_FILES: RecordSchema = RecordSchema {
    kind: "unmanaged_files",
    attributes: AttributePolicy::Declared(&[
        attr("extracted"),
        AttributeSpec {
            name: "files",
            element_type: Some(ElementType::Collection(&UNMANAGED_FILE_LIST)),
        },
    ]),
    compare: CompareMode::Composite {
        scalars: &["extracted"],
        collections: &["files"],
    },
};

/// Looks up the declared kind for a scope name.
pub fn scope_element_type(scope: &str) -> Option<ElementType> {
    match scope {
        "packages" => Some(ElementType::Collection(&PACKAGES)),
        "repositories" => Some(ElementType::Collection(&REPOSITORIES)),
        "users" => Some(ElementType::Collection(&USERS)),
        "groups" => Some(ElementType::Collection(&GROUPS)),
        "services" => Some(ElementType::Collection(&SERVICES)),
        "os" => Some(ElementType::Record(&OS)),
        "unmanaged_files" => Some(ElementType::Record(&UNMANAGED_FILES)),
        _ => None,
    }
}

//! Storefront collections and their declarative schemas.
//!
//! Each collection knows how rows are identified, which columns the grid
//! shows, which fields the add/edit form asks for, and how the status filter
//! tabs map onto the service's status vocabulary.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{SyncError, SyncResult};
use crate::record::Attributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
  #[default]
  Customers,
  Suppliers,
  Brands,
  Categories,
  Products,
  Variations,
}

/// Input widget kind for a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Tel,
  Number,
}

/// One field of the add/edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  pub name: &'static str,
  pub label: &'static str,
  pub kind: FieldKind,
  /// Fixed choices; empty means free input
  pub options: &'static [&'static str],
}

impl FieldSpec {
  const fn text(name: &'static str, label: &'static str) -> Self {
    Self {
      name,
      label,
      kind: FieldKind::Text,
      options: &[],
    }
  }

  const fn tel(name: &'static str, label: &'static str) -> Self {
    Self {
      name,
      label,
      kind: FieldKind::Tel,
      options: &[],
    }
  }

  const fn number(name: &'static str, label: &'static str) -> Self {
    Self {
      name,
      label,
      kind: FieldKind::Number,
      options: &[],
    }
  }

  const fn choice(name: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
    Self {
      name,
      label,
      kind: FieldKind::Text,
      options,
    }
  }

  /// Characters the form input accepts for this field, if restricted.
  pub fn char_filter(&self) -> Option<fn(char) -> bool> {
    match self.kind {
      FieldKind::Text => None,
      FieldKind::Tel => Some(is_phone_char),
      FieldKind::Number => Some(is_number_char),
    }
  }

  /// Convert raw form text to the value sent to the service. Number fields
  /// that do not parse are sent as text and left for the service to reject.
  pub fn to_value(&self, raw: &str) -> Value {
    let raw = raw.trim();
    if self.kind == FieldKind::Number {
      if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
      }
      if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        return Value::Number(n);
      }
    }
    Value::String(raw.to_string())
  }
}

fn is_phone_char(c: char) -> bool {
  c.is_ascii_digit() || matches!(c, '+' | '-' | ' ')
}

fn is_number_char(c: char) -> bool {
  c.is_ascii_digit() || matches!(c, '.' | '-')
}

/// Grid column definition. Opaque to the sync layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
  pub field: &'static str,
  pub header: &'static str,
  pub width: u16,
}

const fn col(field: &'static str, header: &'static str, width: u16) -> ColumnDef {
  ColumnDef {
    field,
    header,
    width,
  }
}

/// GraphQL operation names for one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operations {
  pub list: &'static str,
  pub create: &'static str,
  pub create_input: &'static str,
  pub update: &'static str,
  pub update_input: &'static str,
  pub delete: &'static str,
  /// GraphQL input type shared by create and update
  pub input_type: &'static str,
}

const PARTY_COLUMNS: &[ColumnDef] = &[
  col("name", "Name", 24),
  col("phone", "Phone", 16),
  col("createdAt", "Created At", 12),
  col("balance", "Balance", 12),
  col("status", "Status", 12),
];

impl Collection {
  pub const ALL: &'static [Collection] = &[
    Collection::Customers,
    Collection::Suppliers,
    Collection::Brands,
    Collection::Categories,
    Collection::Products,
    Collection::Variations,
  ];

  /// Stable lowercase name, used for storage keys and commands
  pub fn name(&self) -> &'static str {
    match self {
      Collection::Customers => "customers",
      Collection::Suppliers => "suppliers",
      Collection::Brands => "brands",
      Collection::Categories => "categories",
      Collection::Products => "products",
      Collection::Variations => "variations",
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      Collection::Customers => "Customers",
      Collection::Suppliers => "Suppliers",
      Collection::Brands => "Brands",
      Collection::Categories => "Categories",
      Collection::Products => "Products",
      Collection::Variations => "Variations",
    }
  }

  /// Singular noun for form titles ("Add New Customer")
  pub fn singular(&self) -> &'static str {
    match self {
      Collection::Customers => "Customer",
      Collection::Suppliers => "Supplier",
      Collection::Brands => "Brand",
      Collection::Categories => "Category",
      Collection::Products => "Product",
      Collection::Variations => "Variation",
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|c| c.name() == name)
  }

  /// Attribute that carries the row identity on the wire.
  /// Parties are keyed by phone number.
  pub fn id_field(&self) -> &'static str {
    match self {
      Collection::Customers | Collection::Suppliers => "phone",
      _ => "id",
    }
  }

  pub fn columns(&self) -> &'static [ColumnDef] {
    match self {
      Collection::Customers | Collection::Suppliers => PARTY_COLUMNS,
      Collection::Brands => const { &[
        col("name", "Brand Name", 28),
        col("createdAt", "Created At", 12),
        col("status", "Status", 12),
      ] },
      Collection::Categories => const { &[
        col("name", "Category Name", 24),
        col("brand", "Brand Assigned", 20),
        col("createdAt", "Created At", 12),
        col("status", "Status", 12),
      ] },
      Collection::Products => const { &[
        col("name", "Name", 24),
        col("category", "Category", 18),
        col("price", "Price", 10),
        col("status", "Status", 14),
      ] },
      Collection::Variations => const { &[
        col("name", "Variation Name", 24),
        col("pieces", "Pieces", 8),
        col("price", "Price", 10),
        col("createdAt", "Created At", 12),
        col("status", "Status", 14),
      ] },
    }
  }

  pub fn fields(&self) -> &'static [FieldSpec] {
    match self {
      Collection::Customers => const { &[
        FieldSpec::text("name", "Customer Name"),
        FieldSpec::tel("phone", "Phone"),
        FieldSpec::choice("status", "Status", &["Received", "Pending"]),
      ] },
      Collection::Suppliers => const { &[
        FieldSpec::text("name", "Supplier Name"),
        FieldSpec::tel("phone", "Phone"),
        FieldSpec::number("balance", "Balance"),
        FieldSpec::choice("status", "Status", &["Due", "Paid"]),
      ] },
      Collection::Brands => const { &[
        FieldSpec::number("id", "Brand Id"),
        FieldSpec::text("name", "Brand Name"),
        FieldSpec::choice("status", "Status", &["Active", "Inactive"]),
      ] },
      Collection::Categories => const { &[
        FieldSpec::number("id", "Category Id"),
        FieldSpec::text("name", "Category Name"),
        FieldSpec::text("brand", "Assign To Brand"),
        FieldSpec::choice("status", "Status", &["Active", "Inactive"]),
      ] },
      Collection::Products => const { &[
        FieldSpec::number("id", "Product Id"),
        FieldSpec::text("name", "Product Name"),
        FieldSpec::text("category", "Category Name"),
        FieldSpec::number("pieces", "Pieces Per Ctn"),
        FieldSpec::number("price", "Default Price"),
        FieldSpec::choice("status", "Status", &["In Stock", "Out of Stock"]),
      ] },
      Collection::Variations => const { &[
        FieldSpec::number("id", "Variation Id"),
        FieldSpec::text("name", "Variation Name"),
        FieldSpec::number("pieces", "Pieces Per Ctn"),
        FieldSpec::number("price", "Default Price"),
        FieldSpec::choice("status", "Status", &["Available", "Out of Stock"]),
      ] },
    }
  }

  /// Labels of the status filter tabs, "All" first.
  pub fn status_filters(&self) -> &'static [&'static str] {
    match self {
      Collection::Customers => &["All", "Pending Payments", "Received Payments"],
      Collection::Suppliers => &["All", "Due", "Paid"],
      Collection::Brands | Collection::Categories => &["All", "Active", "Inactive"],
      Collection::Products => &["All", "In Stock", "Out of Stock"],
      Collection::Variations => &["All", "Available", "Out of Stock"],
    }
  }

  /// Map a filter tab label to the service status value.
  /// "All" and unknown labels mean no status filter.
  pub fn status_for_label(&self, label: &str) -> Option<&'static str> {
    let mapping: &[(&str, &str)] = match self {
      Collection::Customers => &[
        ("Pending Payments", "Pending"),
        ("Received Payments", "Received"),
      ],
      Collection::Suppliers => &[("Due", "Due"), ("Paid", "Paid")],
      Collection::Brands | Collection::Categories => {
        &[("Active", "Active"), ("Inactive", "Inactive")]
      }
      Collection::Products => &[("In Stock", "In Stock"), ("Out of Stock", "Out of Stock")],
      Collection::Variations => &[
        ("Available", "Available"),
        ("Out of Stock", "Out of Stock"),
      ],
    };
    mapping
      .iter()
      .find(|(l, _)| *l == label)
      .map(|(_, status)| *status)
  }

  pub fn operations(&self) -> Operations {
    match self {
      Collection::Customers => Operations {
        list: "customersPaginated",
        create: "createCustomer",
        create_input: "createCustomerInput",
        update: "updateCustomer",
        update_input: "updateCustomerInput",
        delete: "removeCustomer",
        input_type: "CreateCustomerInput",
      },
      Collection::Suppliers => Operations {
        list: "suppliersPaginated",
        create: "createSupplier",
        create_input: "createSupplierInput",
        update: "updateSupplier",
        update_input: "updateSupplierInput",
        delete: "removeSupplier",
        input_type: "CreateSupplierInput",
      },
      Collection::Brands => Operations {
        list: "brandsPaginated",
        create: "createBrand",
        create_input: "createBrandInput",
        update: "updateBrand",
        update_input: "updateBrandInput",
        delete: "removeBrand",
        input_type: "CreateBrandInput",
      },
      Collection::Categories => Operations {
        list: "categoriesPaginated",
        create: "createCategory",
        create_input: "createCategoryInput",
        update: "updateCategory",
        update_input: "updateCategoryInput",
        delete: "removeCategory",
        input_type: "CreateCategoryInput",
      },
      Collection::Products => Operations {
        list: "productsPaginated",
        create: "createProduct",
        create_input: "createProductInput",
        update: "updateProduct",
        update_input: "updateProductInput",
        delete: "removeProduct",
        input_type: "CreateProductInput",
      },
      Collection::Variations => Operations {
        list: "variationsPaginated",
        create: "createVariation",
        create_input: "createVariationInput",
        update: "updateVariation",
        update_input: "updateVariationInput",
        delete: "removeVariation",
        input_type: "CreateVariationInput",
      },
    }
  }

  /// Attributes requested for every row: columns, form fields and the id.
  pub fn selection(&self) -> Vec<&'static str> {
    let mut fields: Vec<&'static str> = Vec::new();
    let candidates = std::iter::once(self.id_field())
      .chain(self.columns().iter().map(|c| c.field))
      .chain(self.fields().iter().map(|f| f.name));
    for field in candidates {
      if !fields.contains(&field) {
        fields.push(field);
      }
    }
    fields
  }

  /// Check that every form field has a non-blank value.
  pub fn validate(&self, data: &Attributes) -> SyncResult<()> {
    for field in self.fields() {
      let filled = data
        .get(field.name)
        .and_then(crate::record::display_value)
        .is_some_and(|v| !v.trim().is_empty());
      if !filled {
        return Err(SyncError::Validation {
          field: field.name.to_string(),
          label: field.label.to_string(),
        });
      }
    }
    Ok(())
  }
}

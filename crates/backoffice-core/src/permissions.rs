//! # Permission Matrix
//!
//! User accounts carry one visibility flag per functional section of the
//! back-office. Every flag is an explicit field and every lookup is an
//! exhaustive `match`, so adding a [`Section`] fails to compile until the
//! matrix, its presets and its serialized form all know about it.
//!
//! ## Gate Usage
//! ```text
//! caller ──► UserAccount::can_write(Section::Retail)?
//!               │
//!               ├── no  → reject (FORBIDDEN)
//!               └── yes → registerSale / createClient / ...
//! ```
//!
//! The core managers never consult this module themselves; the caller gates.

use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
    /// Read-only: may see allowed sections but never mutate.
    Viewer,
}

/// A functional area of the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Products,
    Stock,
    PublishedPrices,
    PriceList,
    Clients,
    Brands,
    Suppliers,
    Wholesale,
    BrandWholesale,
    Retail,
    Profitability,
    Expenses,
    Purchases,
    CreditNotes,
    Logs,
    Users,
}

impl Section {
    /// Every section, in menu order.
    pub const ALL: [Section; 17] = [
        Section::Dashboard,
        Section::Products,
        Section::Stock,
        Section::PublishedPrices,
        Section::PriceList,
        Section::Clients,
        Section::Brands,
        Section::Suppliers,
        Section::Wholesale,
        Section::BrandWholesale,
        Section::Retail,
        Section::Profitability,
        Section::Expenses,
        Section::Purchases,
        Section::CreditNotes,
        Section::Logs,
        Section::Users,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Products => "Products",
            Section::Stock => "Stock",
            Section::PublishedPrices => "Published Prices",
            Section::PriceList => "Price List",
            Section::Clients => "Clients",
            Section::Brands => "Brands",
            Section::Suppliers => "Suppliers",
            Section::Wholesale => "Wholesale",
            Section::BrandWholesale => "Brand Wholesale",
            Section::Retail => "Retail",
            Section::Profitability => "Profitability",
            Section::Expenses => "Expenses",
            Section::Purchases => "Purchases",
            Section::CreditNotes => "Credit Notes",
            Section::Logs => "Activity Logs",
            Section::Users => "User Management",
        }
    }
}

/// One boolean per section.
///
/// Serialized with the `can_view_*` keys the account store uses. No field has
/// a serde default: a stored matrix missing a key is rejected instead of
/// silently showing the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    #[serde(rename = "can_view_dashboard")]
    pub dashboard: bool,
    #[serde(rename = "can_view_products")]
    pub products: bool,
    #[serde(rename = "can_view_stock")]
    pub stock: bool,
    #[serde(rename = "can_view_precios")]
    pub published_prices: bool,
    #[serde(rename = "can_view_zentor")]
    pub price_list: bool,
    #[serde(rename = "can_view_clients")]
    pub clients: bool,
    #[serde(rename = "can_view_brands")]
    pub brands: bool,
    #[serde(rename = "can_view_suppliers")]
    pub suppliers: bool,
    #[serde(rename = "can_view_wholesale")]
    pub wholesale: bool,
    #[serde(rename = "can_view_wholesale_bullpadel")]
    pub brand_wholesale: bool,
    #[serde(rename = "can_view_retail")]
    pub retail: bool,
    #[serde(rename = "can_view_rentabilidad")]
    pub profitability: bool,
    #[serde(rename = "can_view_gastos")]
    pub expenses: bool,
    #[serde(rename = "can_view_compras")]
    pub purchases: bool,
    #[serde(rename = "can_view_notas_credito")]
    pub credit_notes: bool,
    #[serde(rename = "can_view_logs")]
    pub logs: bool,
    #[serde(rename = "can_view_users")]
    pub users: bool,
}

impl PermissionMatrix {
    /// Every section visible.
    pub const fn all() -> Self {
        PermissionMatrix {
            dashboard: true,
            products: true,
            stock: true,
            published_prices: true,
            price_list: true,
            clients: true,
            brands: true,
            suppliers: true,
            wholesale: true,
            brand_wholesale: true,
            retail: true,
            profitability: true,
            expenses: true,
            purchases: true,
            credit_notes: true,
            logs: true,
            users: true,
        }
    }

    /// Nothing visible.
    pub const fn none() -> Self {
        PermissionMatrix {
            dashboard: false,
            products: false,
            stock: false,
            published_prices: false,
            price_list: false,
            clients: false,
            brands: false,
            suppliers: false,
            wholesale: false,
            brand_wholesale: false,
            retail: false,
            profitability: false,
            expenses: false,
            purchases: false,
            credit_notes: false,
            logs: false,
            users: false,
        }
    }

    /// Preset applied when an account is created with the given role.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => PermissionMatrix::all(),
            Role::User | Role::Viewer => PermissionMatrix::default(),
        }
    }

    pub fn allows(&self, section: Section) -> bool {
        match section {
            Section::Dashboard => self.dashboard,
            Section::Products => self.products,
            Section::Stock => self.stock,
            Section::PublishedPrices => self.published_prices,
            Section::PriceList => self.price_list,
            Section::Clients => self.clients,
            Section::Brands => self.brands,
            Section::Suppliers => self.suppliers,
            Section::Wholesale => self.wholesale,
            Section::BrandWholesale => self.brand_wholesale,
            Section::Retail => self.retail,
            Section::Profitability => self.profitability,
            Section::Expenses => self.expenses,
            Section::Purchases => self.purchases,
            Section::CreditNotes => self.credit_notes,
            Section::Logs => self.logs,
            Section::Users => self.users,
        }
    }

    pub fn set(&mut self, section: Section, allowed: bool) {
        let flag = match section {
            Section::Dashboard => &mut self.dashboard,
            Section::Products => &mut self.products,
            Section::Stock => &mut self.stock,
            Section::PublishedPrices => &mut self.published_prices,
            Section::PriceList => &mut self.price_list,
            Section::Clients => &mut self.clients,
            Section::Brands => &mut self.brands,
            Section::Suppliers => &mut self.suppliers,
            Section::Wholesale => &mut self.wholesale,
            Section::BrandWholesale => &mut self.brand_wholesale,
            Section::Retail => &mut self.retail,
            Section::Profitability => &mut self.profitability,
            Section::Expenses => &mut self.expenses,
            Section::Purchases => &mut self.purchases,
            Section::CreditNotes => &mut self.credit_notes,
            Section::Logs => &mut self.logs,
            Section::Users => &mut self.users,
        };
        *flag = allowed;
    }

    /// Flips one section and returns the new value.
    pub fn toggle(&mut self, section: Section) -> bool {
        let next = !self.allows(section);
        self.set(section, next);
        next
    }

    /// Sections currently visible, in menu order.
    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.allows(*s))
            .collect()
    }
}

/// New accounts see everything except the activity logs and wholesale.
impl Default for PermissionMatrix {
    fn default() -> Self {
        PermissionMatrix {
            logs: false,
            wholesale: false,
            ..PermissionMatrix::all()
        }
    }
}

/// An authenticated back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub permissions: PermissionMatrix,
}

impl UserAccount {
    /// Creates an active account with the role's preset matrix.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        UserAccount {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
            is_active: true,
            permissions: PermissionMatrix::for_role(role),
        }
    }

    pub fn can_view(&self, section: Section) -> bool {
        self.is_active && self.permissions.allows(section)
    }

    /// Viewers never write, even to sections they can see.
    pub fn can_write(&self, section: Section) -> bool {
        self.can_view(section) && self.role != Role::Viewer
    }
}

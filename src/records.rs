//! CRM record types
//!
//! Accounts are parents; Contacts reference an Account by last name, and
//! Opportunities carry the business fields the upsert defaults fill in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resolver::KeyedChild;

/// A customer account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned id, `None` before insert
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            rating: None,
            industry: None,
            phone: None,
        }
    }
}

/// Field changes applied by update-by-name; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.industry.is_none() && self.phone.is_none()
    }

    /// Apply the set fields to `account`
    pub fn apply(&self, account: &mut Account) {
        if let Some(rating) = &self.rating {
            account.rating = Some(rating.clone());
        }
        if let Some(industry) = &self.industry {
            account.industry = Some(industry.clone());
        }
        if let Some(phone) = &self.phone {
            account.phone = Some(phone.clone());
        }
    }
}

/// A person at a customer account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub first_name: Option<String>,
    pub last_name: String,
    /// Parent Account, set by linking
    #[serde(default)]
    pub account_id: Option<Uuid>,
}

impl Contact {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: Some(first_name.into()),
            last_name: last_name.into(),
            account_id: None,
        }
    }
}

// Contact.last_name -> Account.name
impl KeyedChild<Uuid> for Contact {
    fn parent_key(&self) -> &str {
        &self.last_name
    }

    fn assign_parent(&mut self, id: Uuid) {
        self.account_id = Some(id);
    }
}

/// A sales opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub stage_name: String,
    pub close_date: NaiveDate,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub account_id: Option<Uuid>,
}

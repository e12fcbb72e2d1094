//! The `/organisation/accounts` resource.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::client::{Client, Response};
use crate::config::ClientOptions;
use crate::error::Result;

pub const ACCOUNTS_PATH: &str = "/organisation/accounts";
pub const ACCOUNT_TYPE: &str = "accounts";

/// An account record. `A` is the attribute schema; most callers use the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account<A = AccountAttributes> {
    pub id: String,

    #[serde(default)]
    pub organisation_id: String,

    #[serde(rename = "type", default)]
    pub account_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<A>,

    #[serde(default)]
    pub version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<AccountRelationships>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

/// An account carrying the Confirmation of Payee attribute set.
pub type ConfirmationOfPayeeAccount = Account<ConfirmationOfPayeeAttributes>;

impl<A> Account<A> {
    /// A new, unversioned account of type `accounts` with no attributes.
    pub fn new(id: impl Into<String>, organisation_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            organisation_id: organisation_id.into(),
            account_type: ACCOUNT_TYPE.to_string(),
            attributes: None,
            version: 0,
            relationships: None,
            created_on: None,
            modified_on: None,
        }
    }

    pub fn with_attributes(mut self, attributes: A) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountAttributes {
    pub country: String,
    pub base_currency: String,
    pub bank_id: String,
    pub bank_id_code: String,
    pub account_number: String,
    pub bic: String,
    pub iban: String,
    pub customer_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_identification: Option<PrivateIdentification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_identification: Option<OrganizationIdentification>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationOfPayeeAttributes {
    #[serde(flatten)]
    pub account: AccountAttributes,
    #[serde(default)]
    pub alternative_names: Vec<String>,
    #[serde(default)]
    pub account_classification: String,
    #[serde(default)]
    pub joint_account: bool,
    #[serde(default)]
    pub account_matching_opt_out: bool,
    #[serde(default)]
    pub secondary_identification: String,
    #[serde(default)]
    pub switched: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivateIdentification {
    pub birth_date: String,
    pub birth_country: String,
    pub identification: String,
    pub address: Vec<String>,
    pub country: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationIdentification {
    pub identification: String,
    pub actors: OrganizationActor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationActor {
    pub name: String,
    pub birth_date: String,
    pub residency: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRelationships {
    #[serde(default)]
    pub master_account: Vec<MasterAccountRelation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterAccountRelation {
    pub id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
}

/// Pagination for [`AccountsService::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountListOptions {
    /// Page number: an integer, `first` or `last`.
    pub number: String,
    pub size: u32,
}

impl AccountListOptions {
    pub fn page(number: u32, size: u32) -> Self {
        Self {
            number: number.to_string(),
            size,
        }
    }

    pub fn first(size: u32) -> Self {
        Self {
            number: "first".to_string(),
            size,
        }
    }

    pub fn last(size: u32) -> Self {
        Self {
            number: "last".to_string(),
            size,
        }
    }

    pub fn query(&self) -> String {
        format!("page[number]={}&page[size]={}", self.number, self.size)
    }
}

/// Create, fetch, list and delete accounts through a [`Client`].
///
/// Every call returns the [`Response`] on success; on failure it is reachable
/// through [`ClientError::response`](crate::ClientError::response).
#[derive(Debug, Clone)]
pub struct AccountsService {
    client: Client,
}

impl AccountsService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn with_options(options: ClientOptions) -> Result<Self> {
        Ok(Self::new(Client::new(options)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn create<A>(
        &self,
        ctx: Option<&CancellationToken>,
        account: &Account<A>,
    ) -> Result<(Account<A>, Response)>
    where
        A: Serialize + DeserializeOwned,
    {
        let req = self.client.post(ACCOUNTS_PATH, account)?;
        self.client.execute_into(ctx, req).await
    }

    pub async fn by_id(
        &self,
        ctx: Option<&CancellationToken>,
        id: &str,
    ) -> Result<(Account, Response)> {
        self.by_id_as(ctx, id).await
    }

    /// Like [`by_id`](Self::by_id) with a caller-chosen attribute schema.
    pub async fn by_id_as<A: DeserializeOwned>(
        &self,
        ctx: Option<&CancellationToken>,
        id: &str,
    ) -> Result<(Account<A>, Response)> {
        let req = self.client.get(&format!("{ACCOUNTS_PATH}/{id}"))?;
        self.client.execute_into(ctx, req).await
    }

    pub async fn list(
        &self,
        ctx: Option<&CancellationToken>,
        options: Option<&AccountListOptions>,
    ) -> Result<(Vec<Account>, Response)> {
        self.list_as(ctx, options).await
    }

    /// Like [`list`](Self::list) with a caller-chosen attribute schema.
    ///
    /// A page past the end may come back as `"data": null`; that is an empty list.
    pub async fn list_as<A: DeserializeOwned>(
        &self,
        ctx: Option<&CancellationToken>,
        options: Option<&AccountListOptions>,
    ) -> Result<(Vec<Account<A>>, Response)> {
        let path = match options {
            Some(options) => format!("{ACCOUNTS_PATH}?{}", options.query()),
            None => ACCOUNTS_PATH.to_string(),
        };
        let req = self.client.get(&path)?;
        let (accounts, resp) = self
            .client
            .execute_into::<Option<Vec<Account<A>>>>(ctx, req)
            .await?;
        Ok((accounts.unwrap_or_default(), resp))
    }

    /// Delete `id` at `version`. The status code is passed through as the remote sent it.
    pub async fn delete(
        &self,
        ctx: Option<&CancellationToken>,
        id: &str,
        version: i64,
    ) -> Result<Response> {
        let req = self
            .client
            .delete(&format!("{ACCOUNTS_PATH}/{id}?version={version}"))?;
        self.client.execute(ctx, req).await
    }
}

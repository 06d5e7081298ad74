//! Method dispatch for bridge requests.

use keybroker_core::{
    AccountOptions, AccountPatch, Error, Keyring, Operation, OriginPermissions, PendingRequest,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::protocol::{RpcError, RpcErrorCode, RpcFrame};

/// Shared context for method dispatch.
pub struct DispatchContext<'a> {
    pub keyring: &'a Keyring,
    pub permissions: &'a OriginPermissions,
}

/// Route one request to the keyring after the origin check.
pub async fn dispatch(
    id: &str,
    origin: &str,
    method: &str,
    params: Value,
    ctx: &DispatchContext<'_>,
) -> RpcFrame {
    let Ok(operation) = method.parse::<Operation>() else {
        return RpcFrame::err(
            id,
            RpcError::new(
                RpcErrorCode::UnknownMethod,
                format!("Unknown method: {}", method),
            ),
        );
    };

    if let Err(e) = ctx.permissions.check(origin, operation) {
        warn!(origin = %origin, method = %method, "Permission denied");
        return RpcFrame::err(id, e.into());
    }

    match call(operation, params, ctx.keyring).await {
        Ok(result) => RpcFrame::ok(id, result),
        Err(e) => {
            if e.is_validation() {
                debug!(method = %method, code = e.code(), error = %e, "Operation rejected");
            } else {
                warn!(method = %method, code = e.code(), error = %e, "Operation failed");
            }
            RpcFrame::err(id, e.into())
        }
    }
}

#[derive(Deserialize)]
struct AccountIdParams {
    id: Uuid,
}

#[derive(Deserialize)]
struct CreateAccountParams {
    #[serde(default)]
    options: AccountOptions,
}

#[derive(Deserialize)]
struct UpdateAccountParams {
    account: AccountPatch,
}

#[derive(Deserialize)]
struct FilterChainsParams {
    id: Uuid,
    chains: Vec<String>,
}

#[derive(Deserialize)]
struct RequestIdParams {
    id: String,
}

#[derive(Deserialize)]
struct SubmitRequestParams {
    request: PendingRequest,
}

#[derive(Deserialize)]
struct ApproveRequestParams {
    id: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct ApprovalModeParams {
    enabled: bool,
}

async fn call(operation: Operation, params: Value, keyring: &Keyring) -> keybroker_core::Result<Value> {
    let value = match operation {
        Operation::ListAccounts => serde_json::to_value(keyring.list_accounts().await?)?,
        Operation::GetAccount => {
            let p: AccountIdParams = parse_params(params)?;
            serde_json::to_value(keyring.get_account(&p.id).await?)?
        }
        Operation::CreateAccount => {
            let p: CreateAccountParams = parse_params(params)?;
            serde_json::to_value(keyring.create_account(p.options).await?)?
        }
        Operation::UpdateAccount => {
            let p: UpdateAccountParams = parse_params(params)?;
            serde_json::to_value(keyring.update_account(p.account).await?)?
        }
        Operation::DeleteAccount => {
            let p: AccountIdParams = parse_params(params)?;
            keyring.delete_account(&p.id).await?;
            Value::Null
        }
        Operation::FilterAccountChains => {
            let p: FilterChainsParams = parse_params(params)?;
            serde_json::to_value(keyring.filter_account_chains(&p.id, &p.chains))?
        }
        Operation::ListRequests => serde_json::to_value(keyring.list_requests().await?)?,
        Operation::GetRequest => {
            let p: RequestIdParams = parse_params(params)?;
            serde_json::to_value(keyring.get_request(&p.id).await?)?
        }
        Operation::SubmitRequest => {
            let p: SubmitRequestParams = parse_params(params)?;
            serde_json::to_value(keyring.submit_request(p.request).await?)?
        }
        Operation::ApproveRequest => {
            let p: ApproveRequestParams = parse_params(params)?;
            keyring.approve_request(&p.id, p.data).await?
        }
        Operation::RejectRequest => {
            let p: RequestIdParams = parse_params(params)?;
            keyring.reject_request(&p.id).await?;
            Value::Null
        }
        Operation::GetApprovalMode => Value::Bool(keyring.approval_mode().await?),
        Operation::SetApprovalMode => {
            let p: ApprovalModeParams = parse_params(params)?;
            Value::Bool(keyring.set_approval_mode(p.enabled).await?)
        }
    };
    Ok(value)
}

/// Decode operation parameters; a missing params field reads as `{}`.
fn parse_params<T: DeserializeOwned>(params: Value) -> keybroker_core::Result<T> {
    let params = if params.is_null() {
        Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| Error::InvalidParams(e.to_string()))
}

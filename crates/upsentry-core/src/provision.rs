// ── Network configuration write ──
//
// Two SET PDUs: one batch that stages DHCP off, auto-restart on and the
// new address, then a separate apply. A SET PDU is all-or-nothing, so a
// rejected batch leaves nothing staged and the apply is skipped.

use std::net::Ipv4Addr;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use upsentry_api::{ObjectId, RawValue, Transport};

use crate::catalog::ProvisioningIdentifiers;
use crate::event;

/// SNMPv2-TC `TruthValue`.
const TRUTH_TRUE: i64 = 1;
const TRUTH_FALSE: i64 = 2;

/// Written to the apply identifier to commit staged settings.
const APPLY_NOW: i64 = 1;

/// Result of a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub ipv4_address: Ipv4Addr,
    /// Identifiers set by the batch, in PDU order.
    pub staged: Vec<ObjectId>,
    pub committed: ObjectId,
}

#[derive(Debug, Error)]
pub enum WriteError {
    /// The batch never reached the device or got no answer.
    #[error("Configuration was not applied ({identifier}): {source}")]
    NotApplied {
        identifier: ObjectId,
        #[source]
        source: upsentry_api::Error,
    },

    /// The device refused the batch; nothing was staged.
    #[error("Device rejected configuration at {identifier} (error-status {status})")]
    BatchRejected { identifier: ObjectId, status: u32 },

    /// The batch was accepted but the apply failed.
    #[error("Settings staged but not committed ({identifier}): {reason}")]
    NotCommitted { identifier: ObjectId, reason: String },
}

impl WriteError {
    pub fn identifier(&self) -> &ObjectId {
        match self {
            Self::NotApplied { identifier, .. }
            | Self::BatchRejected { identifier, .. }
            | Self::NotCommitted { identifier, .. } => identifier,
        }
    }

    /// Whether the device holds staged but uncommitted settings.
    pub fn is_staged(&self) -> bool {
        matches!(self, Self::NotCommitted { .. })
    }
}

/// The staging batch, in the order it is sent.
pub fn configuration_batch(
    identifiers: &ProvisioningIdentifiers,
    new_address: Ipv4Addr,
) -> Vec<(ObjectId, RawValue)> {
    vec![
        (
            identifiers.ipv4_dhcp_enabled.clone(),
            RawValue::Integer(TRUTH_FALSE),
        ),
        (identifiers.auto_restart.clone(), RawValue::Integer(TRUTH_TRUE)),
        (identifiers.ipv4_address.clone(), RawValue::IpAddress(new_address)),
    ]
}

/// Push a static IPv4 configuration to the device and commit it.
pub async fn apply_configuration<T: Transport>(
    transport: &T,
    identifiers: &ProvisioningIdentifiers,
    new_address: Ipv4Addr,
) -> Result<WriteReport, WriteError> {
    let result = push(transport, identifiers, new_address).await;
    match &result {
        Ok(report) => event::write_succeeded(report.ipv4_address),
        Err(e) => event::write_failed(e),
    }
    result
}

async fn push<T: Transport>(
    transport: &T,
    identifiers: &ProvisioningIdentifiers,
    new_address: Ipv4Addr,
) -> Result<WriteReport, WriteError> {
    let batch = configuration_batch(identifiers, new_address);

    let response = transport
        .set(&batch)
        .await
        .map_err(|source| WriteError::NotApplied {
            identifier: identifiers.ipv4_dhcp_enabled.clone(),
            source,
        })?;

    if !response.is_accepted() {
        warn!(
            status = response.error_status,
            index = response.error_index,
            varbinds = ?response.varbinds,
            "configuration batch rejected"
        );
        let identifier = offending(&batch, response.error_index)
            .unwrap_or(&identifiers.ipv4_dhcp_enabled)
            .clone();
        return Err(WriteError::BatchRejected {
            identifier,
            status: response.error_status,
        });
    }
    debug!(count = batch.len(), "configuration batch staged");

    let commit = [(identifiers.apply.clone(), RawValue::Integer(APPLY_NOW))];
    let not_committed = |reason: String| WriteError::NotCommitted {
        identifier: identifiers.apply.clone(),
        reason,
    };
    match transport.set(&commit).await {
        Ok(response) if response.is_accepted() => Ok(WriteReport {
            ipv4_address: new_address,
            staged: batch.into_iter().map(|(oid, _)| oid).collect(),
            committed: identifiers.apply.clone(),
        }),
        Ok(response) => Err(not_committed(format!(
            "device answered error-status {}",
            response.error_status
        ))),
        Err(e) => Err(not_committed(e.to_string())),
    }
}

/// Identifier at the agent's 1-based `error_index`.
fn offending(batch: &[(ObjectId, RawValue)], error_index: u32) -> Option<&ObjectId> {
    let idx = usize::try_from(error_index).ok()?.checked_sub(1)?;
    batch.get(idx).map(|(oid, _)| oid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_order_and_encoding() {
        let ids = ProvisioningIdentifiers::default();
        let batch = configuration_batch(&ids, Ipv4Addr::new(10, 0, 0, 20));
        assert_eq!(
            batch,
            vec![
                (ids.ipv4_dhcp_enabled.clone(), RawValue::Integer(2)),
                (ids.auto_restart.clone(), RawValue::Integer(1)),
                (
                    ids.ipv4_address.clone(),
                    RawValue::IpAddress(Ipv4Addr::new(10, 0, 0, 20))
                ),
            ]
        );
    }

    #[test]
    fn offending_uses_one_based_index() {
        let ids = ProvisioningIdentifiers::default();
        let batch = configuration_batch(&ids, Ipv4Addr::LOCALHOST);
        assert_eq!(offending(&batch, 3), Some(&ids.ipv4_address));
        assert_eq!(offending(&batch, 0), None);
        assert_eq!(offending(&batch, 4), None);
    }
}

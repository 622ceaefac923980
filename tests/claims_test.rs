mod common;

use anyhow::Result;
use clearway::LedgerError;
use clearway::domain::ClaimStatus;
use common::{outsider, recipient, shipper, test_ledger};

#[tokio::test]
async fn test_file_claim() -> Result<()> {
    let ledger = test_ledger().await?;

    let id = ledger
        .claims
        .file_claim(&shipper(), 1, 1000, "Damaged goods")
        .await?;
    assert_eq!(id, 1);

    let claim = ledger.claims.get_claim(id).await?;
    assert_eq!(claim.claimant, shipper());
    assert_eq!(claim.shipment_id, 1);
    assert_eq!(claim.amount, 1000);
    assert_eq!(claim.description, "Damaged goods");
    assert_eq!(claim.status, ClaimStatus::Filed);

    Ok(())
}

#[tokio::test]
async fn test_claim_amount_must_be_positive() -> Result<()> {
    let ledger = test_ledger().await?;

    for amount in [0, -1000] {
        let err = ledger
            .claims
            .file_claim(&shipper(), 1, amount, "Damaged goods")
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
    }

    // Rejected filings do not allocate ids
    let id = ledger
        .claims
        .file_claim(&shipper(), 1, 1, "Damaged goods")
        .await?;
    assert_eq!(id, 1);

    Ok(())
}

#[tokio::test]
async fn test_shipment_reference_is_not_validated() -> Result<()> {
    let ledger = test_ledger().await?;

    // No shipment 77 exists
    let id = ledger
        .claims
        .file_claim(&shipper(), 77, 500, "Lost in transit")
        .await?;
    assert_eq!(ledger.claims.get_claim(id).await?.shipment_id, 77);

    Ok(())
}

#[tokio::test]
async fn test_resolve_claim_matches_decision() -> Result<()> {
    let ledger = test_ledger().await?;
    let approved_id = ledger
        .claims
        .file_claim(&shipper(), 1, 1000, "Damaged goods")
        .await?;
    let rejected_id = ledger
        .claims
        .file_claim(&shipper(), 2, 250, "Late delivery")
        .await?;

    ledger.claims.resolve_claim(&shipper(), approved_id, true).await?;
    ledger.claims.resolve_claim(&shipper(), rejected_id, false).await?;

    assert_eq!(
        ledger.claims.get_claim(approved_id).await?.status,
        ClaimStatus::Approved
    );
    assert_eq!(
        ledger.claims.get_claim(rejected_id).await?.status,
        ClaimStatus::Rejected
    );

    Ok(())
}

#[tokio::test]
async fn test_only_claimant_can_resolve() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .claims
        .file_claim(&shipper(), 1, 1000, "Damaged goods")
        .await?;

    for caller in [recipient(), outsider()] {
        let err = ledger
            .claims
            .resolve_claim(&caller, id, true)
            .await
            .unwrap_err();
        assert_eq!(err.code(), 403);
    }

    assert_eq!(ledger.claims.get_claim(id).await?.status, ClaimStatus::Filed);

    Ok(())
}

#[tokio::test]
async fn test_resolved_claim_cannot_be_resolved_again() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .claims
        .file_claim(&shipper(), 1, 1000, "Damaged goods")
        .await?;

    ledger.claims.resolve_claim(&shipper(), id, false).await?;

    let err = ledger
        .claims
        .resolve_claim(&shipper(), id, true)
        .await
        .unwrap_err();
    assert_eq!(err.code(), 409);
    assert_eq!(
        ledger.claims.get_claim(id).await?.status,
        ClaimStatus::Rejected
    );

    Ok(())
}

#[tokio::test]
async fn test_resolve_missing_claim() -> Result<()> {
    let ledger = test_ledger().await?;

    let err = ledger
        .claims
        .resolve_claim(&shipper(), 5, true)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { kind: "claim", id: 5 }));

    Ok(())
}

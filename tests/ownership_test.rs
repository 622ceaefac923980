mod common;

use anyhow::Result;
use clearway::LedgerError;
use clearway::domain::{Asset, Principal};
use common::{outsider, recipient, shipper, test_ledger};

async fn supply_sum(ledger: &clearway::SupplyChainLedger, asset_id: i64) -> Result<i64> {
    Ok(ledger
        .ownership
        .holders(asset_id)
        .await?
        .iter()
        .map(|(_, amount)| amount)
        .sum())
}

#[tokio::test]
async fn test_create_asset_mints_to_creator() -> Result<()> {
    let ledger = test_ledger().await?;

    let id = ledger
        .ownership
        .create_asset(&shipper(), "Shipping Container XYZ", "container", 1000)
        .await?;
    assert_eq!(id, 1);

    assert_eq!(
        ledger.ownership.get_asset(id).await?,
        Asset {
            name: "Shipping Container XYZ".to_string(),
            asset_type: "container".to_string(),
            total_supply: 1000,
        }
    );
    assert_eq!(ledger.ownership.asset(id).get_balance(&shipper()).await?, 1000);
    assert_eq!(ledger.ownership.asset(id).get_balance(&recipient()).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_asset_snapshot_json_shape() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .ownership
        .create_asset(&shipper(), "Shipping Container XYZ", "container", 1000)
        .await?;

    let json = serde_json::to_value(ledger.ownership.get_asset(id).await?)?;
    assert_eq!(
        json,
        serde_json::json!({
            "name": "Shipping Container XYZ",
            "asset_type": "container",
            "total_supply": 1000
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_transfer_scenario() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .ownership
        .create_asset(&shipper(), "Shipping Container XYZ", "container", 1000)
        .await?;
    let asset = ledger.ownership.asset(id);

    asset.transfer_ownership(&shipper(), &recipient(), 100).await?;
    assert_eq!(asset.get_balance(&shipper()).await?, 900);
    assert_eq!(asset.get_balance(&recipient()).await?, 100);

    let err = asset
        .transfer_ownership(&shipper(), &recipient(), 901)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientBalance {
            balance: 900,
            required: 901,
            ..
        }
    ));
    assert_eq!(err.code(), 402);

    assert_eq!(asset.get_balance(&shipper()).await?, 900);
    assert_eq!(asset.get_balance(&recipient()).await?, 100);

    Ok(())
}

#[tokio::test]
async fn test_supply_is_conserved_across_transfers() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .ownership
        .create_asset(&shipper(), "Pallet Batch 7", "pallet", 500)
        .await?;
    let asset = ledger.ownership.asset(id);

    let moves: [(Principal, Principal, i64); 6] = [
        (shipper(), recipient(), 200),
        (recipient(), outsider(), 150),
        (outsider(), shipper(), 25),
        (recipient(), shipper(), 51), // only 50 left: fails
        (shipper(), shipper(), 10),   // self transfer: fails
        (outsider(), recipient(), 125),
    ];

    for (from, to, amount) in moves {
        let _ = asset.transfer_ownership(&from, &to, amount).await;
        assert_eq!(supply_sum(&ledger, id).await?, 500);
    }

    assert_eq!(asset.get_balance(&shipper()).await?, 325);
    assert_eq!(asset.get_balance(&recipient()).await?, 175);
    assert_eq!(asset.get_balance(&outsider()).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_transfer_rejects_invalid_arguments() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .ownership
        .create_asset(&shipper(), "Shipping Container XYZ", "container", 1000)
        .await?;
    let asset = ledger.ownership.asset(id);

    for amount in [0, -10] {
        let err = asset
            .transfer_ownership(&shipper(), &recipient(), amount)
            .await
            .unwrap_err();
        assert_eq!(err.code(), 400);
    }

    let err = asset
        .transfer_ownership(&shipper(), &shipper(), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    assert_eq!(asset.get_balance(&shipper()).await?, 1000);

    Ok(())
}

#[tokio::test]
async fn test_transfer_whole_balance_leaves_zero() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .ownership
        .create_asset(&shipper(), "Shipping Container XYZ", "container", 1000)
        .await?;
    let asset = ledger.ownership.asset(id);

    asset.transfer_ownership(&shipper(), &recipient(), 1000).await?;

    assert_eq!(asset.get_balance(&shipper()).await?, 0);
    assert_eq!(asset.holders().await?, vec![(recipient(), 1000)]);

    Ok(())
}

#[tokio::test]
async fn test_assets_keep_separate_balances() -> Result<()> {
    let ledger = test_ledger().await?;
    let first = ledger
        .ownership
        .create_asset(&shipper(), "Container A", "container", 1000)
        .await?;
    let second = ledger
        .ownership
        .create_asset(&recipient(), "Container B", "container", 40)
        .await?;
    assert_eq!((first, second), (1, 2));

    ledger
        .ownership
        .transfer_ownership(first, &shipper(), &recipient(), 300)
        .await?;

    assert_eq!(ledger.ownership.get_balance(first, &recipient()).await?, 300);
    assert_eq!(ledger.ownership.get_balance(second, &recipient()).await?, 40);
    assert_eq!(ledger.ownership.get_balance(second, &shipper()).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_zero_supply_asset() -> Result<()> {
    let ledger = test_ledger().await?;
    let id = ledger
        .ownership
        .create_asset(&shipper(), "Placeholder", "container", 0)
        .await?;

    let asset = ledger.ownership.asset(id);
    assert_eq!(asset.get_balance(&shipper()).await?, 0);

    let err = asset
        .transfer_ownership(&shipper(), &recipient(), 1)
        .await
        .unwrap_err();
    assert_eq!(err.code(), 402);

    Ok(())
}

#[tokio::test]
async fn test_negative_supply_is_rejected() -> Result<()> {
    let ledger = test_ledger().await?;

    let err = ledger
        .ownership
        .create_asset(&shipper(), "Broken", "container", -1)
        .await
        .unwrap_err();
    assert_eq!(err.code(), 400);
    assert!(ledger.ownership.list_assets().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_unknown_asset() -> Result<()> {
    let ledger = test_ledger().await?;

    let asset = ledger.ownership.asset(9);
    assert_eq!(asset.get().await.unwrap_err().code(), 404);
    assert_eq!(asset.get_balance(&shipper()).await.unwrap_err().code(), 404);

    let err = asset
        .transfer_ownership(&shipper(), &recipient(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { kind: "asset", id: 9 }));

    Ok(())
}

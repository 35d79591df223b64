//! Canned CoW Protocol quote on Gnosis Chain, served so agents can exercise
//! `eth_signTypedData_v4` against a real-world order document.

use alloy_primitives::{address, Address};
use common::{SignMethod, SignRequest};
use serde_json::{json, Value};

pub const COW_CHAIN_ID: u64 = 100;
pub const COW_TRADER: Address = address!("0x7f01D9b227593E033bf8d6FC86e634d27aa85568");

/// Order typed data exactly as the CoW API hands it to wallets.
pub const COW_ORDER_TYPED_DATA: &str = r#"{"types":{"EIP712Domain":[{"name":"name","type":"string"},{"name":"version","type":"string"},{"name":"chainId","type":"uint256"},{"name":"verifyingContract","type":"address"}],"Order":[{"name":"sellToken","type":"address"},{"name":"buyToken","type":"address"},{"name":"receiver","type":"address"},{"name":"sellAmount","type":"uint256"},{"name":"buyAmount","type":"uint256"},{"name":"validTo","type":"uint32"},{"name":"appData","type":"bytes32"},{"name":"feeAmount","type":"uint256"},{"name":"kind","type":"string"},{"name":"partiallyFillable","type":"bool"},{"name":"sellTokenBalance","type":"string"},{"name":"buyTokenBalance","type":"string"}]},"domain":{"name":"Gnosis Protocol","version":"v2","chainId":100,"verifyingContract":"0x9008D19f58AAbD9eD0D60971565AA8510560ab41"},"primaryType":"Order","message":{"sellToken":"0x9c58bacc331c9aa871afd802db6379a98e80cedb","buyToken":"0x177127622c4a00f3d409b75571e12cb3c8973d3c","receiver":"0x7f01d9b227593e033bf8d6fc86e634d27aa85568","sellAmount":"9999999999996911424","buyAmount":"3989346271524365385328","validTo":1751464539,"appData":"0x0000000000000000000000000000000000000000000000000000000000000000","feeAmount":"3088576","kind":"sell","partiallyFillable":false,"sellTokenBalance":"erc20","buyTokenBalance":"erc20","signingScheme":"eip712"}}"#;

/// A wallet signature collected for [`COW_ORDER_TYPED_DATA`].
pub const COW_ORDER_SIGNATURE: &str = "0x68a014d8a9a48229b4e34e52e55239664fdc688ee0b60f1c5358a0575148e43c6f5c60547dabe0e1b5aa3c1cfc0115442957fb5ac6b14004f1e438c7577b05261b";

pub fn cow_quote() -> Value {
    let transaction = SignRequest {
        chain_id: COW_CHAIN_ID,
        method: SignMethod::SignTypedDataV4(COW_TRADER, COW_ORDER_TYPED_DATA.to_string()),
    };
    json!({
        "meta": {
            "quote": {
                "quote": {
                    "sellToken": "0x9c58bacc331c9aa871afd802db6379a98e80cedb",
                    "buyToken": "0x177127622c4a00f3d409b75571e12cb3c8973d3c",
                    "receiver": "0x7f01d9b227593e033bf8d6fc86e634d27aa85568",
                    "sellAmount": "9999999999996911424",
                    "buyAmount": "3989346271524365385328",
                    "validTo": 1751464539,
                    "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
                    "feeAmount": "3088576",
                    "kind": "sell",
                    "partiallyFillable": false,
                    "sellTokenBalance": "erc20",
                    "buyTokenBalance": "erc20",
                    "signingScheme": "eip712",
                },
                "from": "0x7f01d9b227593e033bf8d6fc86e634d27aa85568",
                "expiration": "2025-07-02T13:27:39.655852297Z",
                "id": 158220901,
                "verified": true,
            },
            "ui": {
                "network": { "name": "Gnosis", "icon": "" },
                "type": "swap",
                "fee": "3088576",
            },
        },
        "transaction": transaction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use common::typed_data::parse_typed_data;
    use common::{verify_signature, MessageData, SignatureEncoding};

    #[test]
    fn order_document_is_typed_data() {
        let typed = parse_typed_data(COW_ORDER_TYPED_DATA).unwrap().expect("typed data");
        assert_eq!(typed.primary_type, "Order");
        assert_eq!(typed.domain.chain_id, Some(U256::from(COW_CHAIN_ID)));
    }

    #[test]
    fn order_signature_is_well_formed() {
        let signature = SignatureEncoding::Packed(COW_ORDER_SIGNATURE.to_string())
            .normalize()
            .unwrap();
        assert_eq!(signature.v(), 27);
    }

    #[test]
    fn wallet_signature_verifies_for_trader() {
        let message = MessageData::from(COW_ORDER_TYPED_DATA);
        let signature = SignatureEncoding::Packed(COW_ORDER_SIGNATURE.to_string());
        assert_eq!(verify_signature(COW_TRADER, &message, &signature), Ok(true));
    }

    #[test]
    fn quote_carries_typed_data_request() {
        let quote = cow_quote();
        assert_eq!(quote["transaction"]["method"], "eth_signTypedData_v4");
        assert_eq!(quote["transaction"]["chainId"], COW_CHAIN_ID);
        assert_eq!(quote["transaction"]["params"][1], COW_ORDER_TYPED_DATA);
    }
}

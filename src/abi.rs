#[allow(clippy::too_many_arguments)]
pub mod order_book {
    alloy::sol!(
        /// Order book of a single long option.
        ///
        /// Resting orders are stored in two dense arrays (bids and offers),
        /// the sign of `amount` encodes the side: positive for bids,
        /// negative for offers. Removing an order shifts the indices of the
        /// orders after it.
        #[derive(Debug)]
        #[sol(rpc)]
        interface OrderBook {
            /// Existing order to take within `sweepAndMake`.
            struct TakeOrder {
                uint256 id;
                int256 amount;
                uint256 price;
            }

            /// Order to post after the takes, all-zero if nothing remains.
            struct MakeOrder {
                int256 amount;
                uint256 price;
                uint256 expiration;
            }

            /// Order posted, on its own or as the residual of a sweep.
            event Make(address indexed owner, bool isBid, uint256 id, int256 amount, uint256 price, uint256 expiration);

            event Take(address indexed taker, bool isBid, uint256 id, int256 amount, uint256 price);

            event Cancel(address indexed owner, bool isBid, uint256 id);

            function longOptionId() external view returns (uint256);

            function numOrders() external view returns (uint256 numBids, uint256 numOffers);

            function status(bool isBid, uint256 id)
                external
                view
                returns (int256 amount, uint256 price, uint256 expiration, address owner);

            function make(int256 amount, uint256 price, uint256 expiration) external returns (uint256);

            function take(uint256 id, int256 amount, uint256 price) external;

            function cancel(bool isBid, uint256 id) external;

            function sweepAndMake(bool isBid, TakeOrder[] calldata takes, MakeOrder calldata make) external;
        }
    );
}

#[allow(clippy::too_many_arguments)]
pub mod options {
    alloy::sol!(
        #[derive(Debug)]
        #[sol(rpc)]
        interface ScholesOption {
            function getOpposite(uint256 optionId) external view returns (uint256);

            function getBaseToken(uint256 optionId) external view returns (address);

            function collateralRequirement(uint256 amount, uint256 optionId, bool isMinimum)
                external
                view
                returns (uint256);
        }
    );
}

pub mod erc20 {
    alloy::sol!(
        #[derive(Debug)]
        #[sol(rpc)]
        interface IERC20Metadata {
            function decimals() external view returns (uint8);

            function symbol() external view returns (string);

            function allowance(address owner, address spender) external view returns (uint256);

            function approve(address spender, uint256 amount) external returns (bool);
        }
    );
}

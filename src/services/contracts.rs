//! Contract interfaces used by the SDK.

alloy::sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address owner) view returns (uint256);
        function decimals() view returns (uint8);
        function transfer(address to, uint256 amount) returns (bool);
    }

    /// Deposits land on L2 once the sequencer picks up the L1 event.
    /// The bridge must hold an allowance for `token`.
    #[sol(rpc)]
    interface IL1Bridge {
        function depositERC20(address token, uint256 amount, address l2Recipient);
    }

    #[sol(rpc)]
    interface IL2Bridge {
        function withdraw(address token, uint256 amount, address l1Recipient);
    }

    /// A zero `dailyLimit` means no limit.
    #[sol(rpc)]
    interface IWalletFactory {
        function createConsumerWallet(address owner) returns (address wallet);
        function createMerchantWallet(address owner, bool whitelistEnabled, uint256 dailyLimit) returns (address wallet);
    }

    #[sol(rpc)]
    interface INameRegistry {
        function register(string name, address resolver);
    }

    #[sol(rpc)]
    interface IStakingPool {
        function stake(uint256 amount, uint256 lockPeriod);
        function unstake(uint256 amount);
        function claimRewards();
    }
}

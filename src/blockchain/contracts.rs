//! ABI bindings for the contracts this crate talks to.

use alloy::sol;

sol! {
    /// Deployed payroll contract (native ETH).
    #[sol(rpc)]
    #[derive(Debug)]
    interface Payroll {
        event PayrollCreated(
            uint256 indexed payrollId,
            address indexed employer,
            uint256 paymentDay,
            uint256 duration,
            uint256 expectedTotalAmount
        );

        function createPayroll(uint256 paymentDay, uint256 duration, uint256 expectedTotalAmount)
            external
            returns (uint256);

        function addEmployee(uint256 payrollId, address employee, uint256 monthlyAmount) external;

        function payrollCounter() external view returns (uint256);

        function isMonthClaimable(uint256 payrollId, uint256 month, uint256 year)
            external
            view
            returns (bool);
    }
}

sol! {
    /// ENS registry: node -> resolver contract.
    #[sol(rpc)]
    interface ENSRegistry {
        function resolver(bytes32 node) external view returns (address);
    }

    /// ENS public resolver: node -> address record.
    #[sol(rpc)]
    interface ENSResolver {
        function addr(bytes32 node) external view returns (address);
    }
}
